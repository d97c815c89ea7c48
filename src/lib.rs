#![allow(non_snake_case)]

pub mod elliptic;
pub mod error;
pub mod fields;
pub mod protocols;
pub mod utilities;
