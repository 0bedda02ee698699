/// Integration tests for usage extraction over real files
use aws_cost_report::{
    error::AppError,
    output,
    product::Product,
    usage::{GroupKey, UsageExtractor, UsageQuery},
};
use rust_decimal_macros::dec;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "bill_id,aws_account_id,month,usage_type,item_description,cost";
const BOX_ROW: [&str; 2] = [HEADER, "b1,111,2024-05,APN1-BoxUsage:t3.micro,t3,0.5"];

fn write_file(dir: &Path, name: &str, lines: &[&str]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, format!("{}\n", lines.join("\n"))).unwrap();
    path.to_string_lossy().into_owned()
}

fn extractor(filter: &str) -> UsageExtractor {
    UsageExtractor::new(UsageQuery::new(filter))
}

#[test]
fn test_two_row_file_filtered_for_fargate() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "bill.csv",
        &[
            HEADER,
            "b1,111,2024-05,BoxUsage:Fargate,vCPU,1.50",
            "b2,111,2024-05,BoxUsage:Lambda-GB,GB-Seconds,2.00",
        ],
    );

    let report = extractor("Fargate").extract(&[file]).unwrap();
    let table = report.to_table();

    assert_eq!(table.rows.len(), 1);
    assert_eq!(
        table.headers,
        vec!["account_id", "month", "usage_type", "item_description", "cost"]
    );
    assert_eq!(table.rows[0][4], "1.5");
}

#[test]
fn test_multi_file_merge_groups_across_files() {
    let dir = TempDir::new().unwrap();
    let may = [HEADER, "b1,111,2024-05,APN1-Fargate-vCPU-Hours,vCPU,1"];
    let june = [HEADER, "b2,111,2024-06,APN1-Fargate-GB-Hours,memory,1"];
    write_file(dir.path(), "2024-05.csv", &may);
    write_file(dir.path(), "2024-06.csv", &june);
    let pattern = format!("{}/*.csv", dir.path().display());

    let query = UsageQuery::new("Fargate").group_by([GroupKey::AccountId]);
    let report = UsageExtractor::new(query).extract(&[pattern]).unwrap();

    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].account_id, "111");
    assert_eq!(report.rows[0].cost, dec!(2));
    assert_eq!(report.to_table().rows[0], vec!["111", "2"]);
}

#[test]
fn test_no_matching_files_is_an_error() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.csv", dir.path().display());

    let err = extractor("Box").extract(&[pattern]).unwrap_err();
    assert!(matches!(err, AppError::NoInputFiles { .. }));
}

#[test]
fn test_pattern_matching_nothing_is_tolerated_when_another_matches() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "bill.csv", &BOX_ROW);
    let missing = format!("{}/nothing-*.csv", dir.path().display());

    let report = extractor("Box").extract(&[missing, file]).unwrap();
    assert_eq!(report.rows.len(), 1);
}

#[test]
fn test_same_file_given_twice_is_read_once() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "bill.csv", &BOX_ROW);
    let pattern = format!("{}/*.csv", dir.path().display());

    let report = extractor("Box").extract(&[file, pattern]).unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.sources.len(), 1);
}

#[test]
fn test_file_without_usage_type_is_skipped_in_merge() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.csv", &BOX_ROW);
    write_file(dir.path(), "b.csv", &["aws_account_id,month,cost", "111,2024-05,9"]);
    let pattern = format!("{}/*.csv", dir.path().display());

    let report = extractor("Box").extract(&[pattern]).unwrap();
    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.total_cost(), Some(dec!(0.5)));
}

#[test]
fn test_single_file_without_usage_type_fails() {
    let dir = TempDir::new().unwrap();
    let no_usage_type = ["aws_account_id,month,cost", "111,2024-05,9"];
    let file = write_file(dir.path(), "b.csv", &no_usage_type);

    match extractor("Box").extract(&[file]).unwrap_err() {
        AppError::MissingColumn { column, .. } => assert_eq!(column, "usage_type"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_result_writes_header_only_csv() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "bill.csv", &BOX_ROW);
    let report = extractor(Product::Lambda.descriptor().usage_type_filter)
        .extract(&[file])
        .unwrap();
    assert!(report.is_empty());

    let out = dir.path().join(Product::Lambda.descriptor().export_file_name);
    output::write_csv_file(&report.to_table(), &out).unwrap();
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "account_id,month,usage_type,item_description,cost\n"
    );
}

#[test]
fn test_negation_rows_and_unparsable_cost_in_grouped_markdown() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "bill.csv",
        &[
            HEADER,
            "b1,111,2024-05,APN1-Fargate-vCPU-Hours,Fargate vCPU,10.0000000000",
            "b2,111,2024-05,APN1-Fargate-vCPU-Hours,SavingsPlanNegation Fargate vCPU,-2.5",
            "b3,111,2024-05,APN1-Fargate-GB-Hours,Fargate memory,n/a",
            "b4,111,2024-05,APN1-Fargate-GB-Hours,Fargate memory,1.2E-1",
        ],
    );

    let query = UsageQuery::new("Fargate")
        .include_negation(false)
        .group_by([GroupKey::UsageType]);
    let report = UsageExtractor::new(query).extract(&[file]).unwrap();
    let markdown = output::render_markdown(&report.to_table(), "Fargate usage");

    assert_eq!(
        markdown,
        "## Fargate usage\n\n\
         | account_id | usage_type | cost |\n\
         | --- | --- | --- |\n\
         | 111 | APN1-Fargate-GB-Hours | 0.12 (unparsable: 1) |\n\
         | 111 | APN1-Fargate-vCPU-Hours | 10 |"
    );
}

#[test]
fn test_overflowing_costs_fail_instead_of_panicking() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "bill.csv",
        &[
            HEADER,
            "b1,111,2024-05,APN1-BoxUsage:m5.large,m5,79228162514264337593543950335",
            "b2,111,2024-05,APN1-BoxUsage:m5.large,m5,79228162514264337593543950335",
        ],
    );

    let query = UsageQuery::new("Box").group_by([GroupKey::AccountId]);
    let err = UsageExtractor::new(query).extract(&[file]).unwrap_err();
    assert!(matches!(err, AppError::CostOverflow(_)));
}

#[test]
fn test_literal_file_name_with_brackets_resolves() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "bill[2024-05].csv", &BOX_ROW);

    let report = extractor("Box").extract(&[file]).unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.sources.len(), 1);
}
