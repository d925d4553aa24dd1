//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `accounts_reader` - Synchronous reader for the opening accounts file
//! - `async_reader` - Asynchronous requests reader with batch interface

pub mod accounts_reader;
pub mod async_reader;
pub mod csv_format;

pub use accounts_reader::AccountsReader;
pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_account_record, convert_request_record, write_accounts_csv, AccountRecord,
    OpeningAccount, RequestRecord,
};
