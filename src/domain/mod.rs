//! Domain model of the KYC workflow: parties, requests, transition rules and
//! the ports the application layer is wired through.

pub mod action;
pub mod event;
pub mod party;
pub mod ports;
pub mod request;
