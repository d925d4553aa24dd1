//! End-to-end integration tests
//!
//! These tests validate the complete pipeline: opening accounts from a CSV
//! file, streaming a requests CSV through the engine in batches and writing
//! the final account states. Each scenario runs with one large batch and
//! with single-request batches.

#[cfg(test)]
mod tests {
    use ledger_engine::config::EngineConfig;
    use ledger_engine::runner::{RunSummary, Runner};
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ACCOUNTS: &str = "type,opening_balance\n\
                            Checking,1000\n\
                            Savings,500\n\
                            Business,0\n";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run_scenario(requests: &str, batch_size: usize) -> (RunSummary, String) {
        let requests = create_temp_csv(requests);
        let accounts = create_temp_csv(ACCOUNTS);
        let mut output = Vec::new();

        let summary = Runner::new(EngineConfig::new(5, batch_size, 2))
            .run(requests.path(), Some(accounts.path()), &mut output)
            .unwrap_or_else(|e| panic!("Failed to process requests: {}", e));

        (summary, String::from_utf8(output).unwrap())
    }

    #[rstest]
    #[case::one_batch(1000)]
    #[case::single_request_batches(1)]
    fn happy_path(#[case] batch_size: usize) {
        let (summary, output) = run_scenario(
            "type,from,to,amount,description\n\
             transfer,1,2,300,Rent\n\
             deposit,,3,250,\n\
             withdrawal,2,,100.50,ATM\n",
            batch_size,
        );

        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            output,
            "id,number,type,balance,active\n\
             1,ACC0000000001,Checking,700.00,true\n\
             2,ACC0000000002,Savings,699.50,true\n\
             3,ACC0000000003,Business,250.00,true\n"
        );
    }

    #[rstest]
    #[case::one_batch(1000)]
    #[case::single_request_batches(1)]
    fn rejected_requests_leave_balances(#[case] batch_size: usize) {
        let (summary, output) = run_scenario(
            "type,from,to,amount,description\n\
             transfer,1,1,10,\n\
             transfer,1,2,0,\n\
             transfer,7,2,10,\n\
             transfer,1,7,10,\n\
             transfer,2,1,501,\n\
             withdrawal,3,,1,\n\
             deposit,,9,5,\n\
             chargeback,1,,5,\n",
            batch_size,
        );

        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 8);
        assert_eq!(
            output,
            "id,number,type,balance,active\n\
             1,ACC0000000001,Checking,1000.00,true\n\
             2,ACC0000000002,Savings,500.00,true\n\
             3,ACC0000000003,Business,0.00,true\n"
        );
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let (summary, output) = run_scenario(
            "type,from,to,amount,description\n\
             deposit,,1,,missing amount\n\
             deposit,,one,10,\n\
             deposit,,1,10,\n",
            1000,
        );

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.succeeded, 1);
        assert!(output.contains("1,ACC0000000001,Checking,1010.00,true"));
    }

    #[test]
    fn case_insensitive_types_and_precision() {
        let (_, output) = run_scenario(
            "type,from,to,amount,description\n\
             DEPOSIT,,3,0.005,\n\
             Transfer,1,3,0.333,\n",
            1000,
        );

        // 0.338 is shown rounded to two places
        assert!(output.contains("3,ACC0000000003,Business,0.34,true"));
        assert!(output.contains("1,ACC0000000001,Checking,999.67,true"));
    }

    #[test]
    fn without_accounts_file_every_request_fails() {
        let requests =
            create_temp_csv("type,from,to,amount,description\ndeposit,,1,10,\n");
        let mut output = Vec::new();

        let summary = Runner::new(EngineConfig::default())
            .run(requests.path(), None, &mut output)
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,number,type,balance,active\n"
        );
    }

    #[test]
    fn missing_accounts_file_is_fatal() {
        let requests = create_temp_csv("type,from,to,amount,description\n");
        let mut output = Vec::new();

        let result = Runner::new(EngineConfig::default()).run(
            requests.path(),
            Some(std::path::Path::new("does-not-exist.csv")),
            &mut output,
        );

        assert!(result.is_err());
    }
}
