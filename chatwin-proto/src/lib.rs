//! Shared data definitions for `chatwin`: message chains, contacts,
//! response envelopes and the payloads carried by them.

pub mod chain;
pub mod codec;
pub mod contact;
pub mod payload;
pub mod response;
