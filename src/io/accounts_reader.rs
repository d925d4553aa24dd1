//! Synchronous reader for the opening accounts file
//!
//! The accounts file is small and read once before any request is processed,
//! so it is parsed with the blocking `csv` reader.
//!
//! # Iterator Interface
//!
//! `AccountsReader` implements `Iterator`, yielding
//! `Result<OpeningAccount, String>` for each row:
//!
//! ```no_run
//! use ledger_engine::io::accounts_reader::AccountsReader;
//! use std::path::Path;
//!
//! let reader = AccountsReader::new(Path::new("accounts.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(account) => println!("Opening {} account", account.account_type),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Row errors are yielded as `Err` items carrying the line number

use crate::io::csv_format::{convert_account_record, AccountRecord, OpeningAccount};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

#[derive(Debug)]
pub struct AccountsReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl AccountsReader {
    /// Open the accounts file
    ///
    /// # Returns
    ///
    /// * `Ok(AccountsReader)` if the file opened successfully
    /// * `Err(String)` if it could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for AccountsReader {
    type Item = Result<OpeningAccount, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<AccountRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        // +1 for the header row
        let line = self.line_num + 1;
        Some(match row {
            Ok(record) => convert_account_record(record).map_err(|e| format!("Line {}: {}", line, e)),
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
