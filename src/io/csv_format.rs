//! CSV format handling for requests, opening accounts and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - `RequestRecord` / `AccountRecord` structures for deserialization
//! - Conversion from CSV records to domain types
//! - Account output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, AccountId, TransactionRequest};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// One row of the requests file: `type,from,to,amount,description`
///
/// `from` and `to` are optional because deposits have no source and
/// withdrawals no destination.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RequestRecord {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub from: Option<AccountId>,
    pub to: Option<AccountId>,
    pub amount: Option<String>,
    pub description: Option<String>,
}

/// One row of the accounts file: `type,opening_balance`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountRecord {
    #[serde(rename = "type")]
    pub account_type: String,
    pub opening_balance: Option<String>,
}

/// An account to open before requests are processed
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningAccount {
    pub account_type: String,
    pub opening_balance: Decimal,
}

/// Convert a RequestRecord to a TransactionRequest
///
/// The type string is passed through untouched: an unknown type is reported
/// per request by the processor, not rejected here. The amount must be
/// present and parse as a decimal; its sign is checked by the processor.
///
/// # Returns
///
/// * `Ok(TransactionRequest)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_request_record(record: RequestRecord) -> Result<TransactionRequest, String> {
    let amount = match record.amount {
        Some(amount) if !amount.trim().is_empty() => parse_amount(&amount)?,
        _ => {
            return Err(format!(
                "{} request requires an amount",
                record.tx_type.trim()
            ))
        }
    };

    let description = record
        .description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    Ok(TransactionRequest {
        from_account: record.from,
        to_account: record.to,
        amount,
        transaction_type: record.tx_type.trim().to_string(),
        description,
    })
}

/// Convert an AccountRecord to an OpeningAccount
///
/// A missing opening balance means zero; a negative one is rejected.
pub fn convert_account_record(record: AccountRecord) -> Result<OpeningAccount, String> {
    let account_type = record.account_type.trim().to_string();
    if account_type.is_empty() {
        return Err("Account type must not be empty".to_string());
    }

    let opening_balance = match record.opening_balance {
        Some(balance) if !balance.trim().is_empty() => parse_amount(&balance)?,
        _ => Decimal::ZERO,
    };
    if opening_balance < Decimal::ZERO {
        return Err(format!(
            "Opening balance {} for {} account is negative",
            opening_balance, account_type
        ));
    }

    Ok(OpeningAccount {
        account_type,
        opening_balance,
    })
}

fn parse_amount(text: &str) -> Result<Decimal, String> {
    Decimal::from_str(text.trim()).map_err(|_| format!("Invalid amount '{}'", text))
}

/// Write account states to CSV format
///
/// Writes accounts with columns: id, number, type, balance, active.
/// Accounts are sorted by id and balances rounded to two decimal places.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "number", "type", "balance", "active"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.number,
                account.account_type,
                format!("{:.2}", account.balance.round_dp(2)),
                account.active.to_string(),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
