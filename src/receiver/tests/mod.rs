mod config;
mod hint;
mod rtp_receiver;
mod socket;
