//! Asynchronous CSV reader with batch interface
//!
//! Streams transaction requests from a CSV file and hands them out in batches,
//! so a large requests file never has to be loaded into memory at once.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of TransactionRequests
//!                  ↓
//!           csv_format module
//!           (RequestRecord, convert_request_record)
//! ```

use crate::io::csv_format::{convert_request_record, RequestRecord};
use crate::types::TransactionRequest;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Provides batch reading interface over transaction requests.
/// Maintains streaming behavior with constant memory usage.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
        }
    }

    /// Read a batch of transaction requests
    ///
    /// Reads up to `batch_size` rows, converting them to TransactionRequests.
    /// Malformed rows are logged and skipped.
    ///
    /// # Returns
    ///
    /// A vector of successfully converted requests. Returns an empty vector
    /// when the end of the file is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TransactionRequest> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<RequestRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => match convert_request_record(record) {
                    Ok(request) => batch.push(request),
                    Err(e) => {
                        warn!(error = %e, "Skipping request row");
                        self.skipped += 1;
                    }
                },
                Some(Err(e)) => {
                    warn!(error = %e, "Skipping unparseable CSV row");
                    self.skipped += 1;
                }
                None => break,
            }
        }

        batch
    }

    /// Rows skipped so far because they could not be parsed or converted
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const HEADER: &str = "type,from,to,amount,description\n";

    fn reader(rows: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        AsyncReader::new(Cursor::new(format!("{}{}", HEADER, rows).into_bytes()))
    }

    #[tokio::test]
    async fn test_read_batch() {
        let mut reader = reader(
            "transfer,1,2,300,rent\n\
             deposit,,2,50,\n\
             withdrawal,1,,25,\n",
        );

        let batch = reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].transaction_type, "transfer");
        assert_eq!(batch[0].from_account, Some(1));
        assert_eq!(batch[0].to_account, Some(2));
        assert_eq!(batch[0].description.as_deref(), Some("rent"));
        assert_eq!(batch[1].from_account, None);
        assert_eq!(batch[1].amount, Decimal::new(50, 0));

        let batch = reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].to_account, None);

        assert!(reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_csv() {
        let mut reader = reader("");
        assert!(reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let mut reader = reader(
            "deposit,,1,lots,\n\
             deposit,x,1,5,\n\
             deposit,,1,5,\n",
        );

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].amount, Decimal::new(5, 0));
        assert_eq!(reader.skipped(), 2);
    }

    #[tokio::test]
    async fn test_unknown_type_reaches_the_batch() {
        let mut reader = reader("refund,1,,5,\n");

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].transaction_type, "refund");
    }

    #[tokio::test]
    async fn test_whitespace_handling() {
        let mut reader = reader("  deposit  ,  ,  3  ,  12.50  ,  payroll  \n");

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].to_account, Some(3));
        assert_eq!(batch[0].amount, Decimal::new(1250, 2));
        assert_eq!(batch[0].description.as_deref(), Some("payroll"));
    }

    #[tokio::test]
    async fn test_short_rows_are_accepted() {
        let mut reader = reader("deposit,,1,10\n");

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].description, None);
    }
}
