//! Protocol module

pub mod rtp;
