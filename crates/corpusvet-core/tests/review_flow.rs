use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use corpusvet_core::classify::{classify, list_directory};
use corpusvet_core::ledger::LedgerStats;
use corpusvet_core::mutate::{remove_row, set_checked, write_record_content};
use corpusvet_core::records::{load_records, CheckState};
use corpusvet_core::{DIFF_FILENAME, LEDGER_FILENAME};

fn write_task(dir: &Path, filenames: &[&str], ledger_rows: Option<&[(&str, &str)]>) {
    std::fs::create_dir_all(dir).expect("task dir");
    let records: Vec<_> = filenames
        .iter()
        .map(|name| {
            json!({
                "filename": name,
                "original_text": format!("raw {name}"),
                "cleaned_body": format!("clean {name}"),
                "highlights": [],
                "metadata": {},
            })
        })
        .collect();
    std::fs::write(dir.join(DIFF_FILENAME), json!(records).to_string()).expect("write diff");

    if let Some(rows) = ledger_rows {
        let mut text = String::from("Filename,Checked");
        for (name, checked) in rows {
            text.push_str(&format!("\n{name},{checked}"));
        }
        std::fs::write(dir.join(LEDGER_FILENAME), text).expect("write ledger");
    }
}

#[test]
fn review_round_trip_updates_listing_stats() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path().join("corpus");
    let task = root.join("batch-01");
    write_task(
        &task,
        &["f1.txt", "f2.txt"],
        Some(&[("f1.txt", "No"), ("f2.txt", "No")]),
    );

    // Nothing reviewed yet.
    let listing = list_directory(&root);
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].progress, LedgerStats::new(2, 0));

    // Review f1, then skip f2 out of the ledger entirely.
    let status = set_checked(&task, "f1.txt", None).expect("set");
    assert_eq!(status, "Yes");
    remove_row(&task, "f2.txt").expect("remove");

    let listing = list_directory(&root);
    assert_eq!(listing.items[0].progress, LedgerStats::new(1, 1));
    assert_eq!(listing.items[0].progress.percent, 100);

    // The records view still shows both diff records, joined to the ledger.
    let records = load_records(&task).expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].checked, CheckState::Yes);
    assert_eq!(records[1].checked, CheckState::No);
}

#[test]
fn diff_derived_and_ledger_derived_counts_are_distinct_views() {
    let temp = TempDir::new().expect("tempdir");
    let task = temp.path().join("fresh-task");
    // Diff exists, ledger does not: the record view shows every record,
    // listing stats stay at zero until a ledger appears.
    write_task(&task, &["f1.txt", "f2.txt", "f3.txt"], None);

    let records = load_records(&task).expect("records");
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.checked == CheckState::No));

    let info = classify(&task);
    assert_eq!(info.stats, Some(LedgerStats::default()));
}

#[test]
fn container_tree_rolls_up_through_output_dirs() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path().join("corpus");

    // batch-01 keeps its output under an `output` subdirectory, batch-02
    // is flat; both must classify as Tasks of the same Container.
    write_task(
        &root.join("batch-01/output"),
        &["f1.txt"],
        Some(&[("f1.txt", "Yes")]),
    );
    write_task(
        &root.join("batch-02"),
        &["f1.txt", "f2.txt"],
        Some(&[("f1.txt", "Yes"), ("f2.txt", "No")]),
    );
    std::fs::create_dir_all(root.join("scratch")).expect("mkdir");

    let info = classify(&root);
    assert!(info.is_container());
    assert_eq!(info.stats, Some(LedgerStats::new(2, 1)));

    let listing = list_directory(&root);
    let names: Vec<_> = listing.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["batch-01", "batch-02", "scratch"]);
    assert!(listing.items[0].is_task);
    assert!(!listing.items[2].is_task && !listing.items[2].is_container);
}

#[test]
fn content_edits_and_ledger_edits_share_the_resolved_dir() {
    let temp = TempDir::new().expect("tempdir");
    let task = temp.path().join("batch-01");
    let output = task.join("output");
    write_task(&output, &["f1.txt"], Some(&[("f1.txt", "No")]));

    let written = write_record_content(&task, "f1.txt", "<title>t</title>").expect("write");
    assert_eq!(written, output.join("f1.txt"));

    set_checked(&task, "f1.txt", Some("Yes")).expect("set");
    let text = std::fs::read_to_string(output.join(LEDGER_FILENAME)).expect("read");
    assert_eq!(text, "Filename,Checked\nf1.txt,Yes");
}
