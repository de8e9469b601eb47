//! Gym Desk - Membership desk for a gym
//!
//! This crate manages members and their subscriptions, validates access from
//! QR member cards, and records check-ins and check-outs at the front desk.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
