// Allow some clippy lints for legacy code - to be fixed gradually
#![allow(clippy::module_inception)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_return)]

pub mod account;
pub mod asset;
pub mod block;
pub mod config;
pub mod crypto;
pub mod serializer;
pub mod transaction;
