mod decoding;
pub mod helpers;
