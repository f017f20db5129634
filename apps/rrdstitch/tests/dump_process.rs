//! End-to-end runs against a stand-in dump binary.
//!
//! Every process-spawning step lives in a single test so that no fork in a
//! parallel test holds the stand-in script open for writing while it runs.

#![cfg(unix)]

use rrdstitch::cli::{Cli, execute};
use rrdstitch_core::StitchError;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Copies the "archive" (already an XML dump) to the requested location,
/// standing in for `rrdtool dump <rrd> <xml>`.
const STAND_IN: &str = "#!/bin/sh\ncp \"$2\" \"$3\"\n";

/// Levels finest first, as `(pdp_per_row, [(epoch, value)])`.
fn dump(levels: &[(u64, Vec<(i64, f64)>)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rrd>\n");
    for cf in ["AVERAGE", "MAX"] {
        for (steps, rows) in levels {
            xml.push_str(&format!(
                "<rra><cf>{cf}</cf><pdp_per_row>{steps}</pdp_per_row><database>\n"
            ));
            for (epoch, value) in rows {
                xml.push_str(&format!(
                    "<!-- d{epoch} / {epoch} --> <row><v>{value:e}</v><v>{value:e}</v></row>\n"
                ));
            }
            xml.push_str("</database></rra>\n");
        }
    }
    xml.push_str("</rrd>\n");
    xml
}

fn cli(rrdtool: &Path, rrd_file: &Path, csv_file: &Path, temp_dir: &Path) -> Cli {
    Cli {
        rrd_file: rrd_file.to_path_buf(),
        csv_file: csv_file.to_path_buf(),
        config: None,
        rrdtool: Some(rrdtool.to_path_buf()),
        temp_dir: Some(temp_dir.to_path_buf()),
        json: false,
        quiet: true,
    }
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read dir").count()
}

fn epochs(csv: &str) -> Vec<i64> {
    csv.lines()
        .filter_map(|line| line.split(',').next()?.parse().ok())
        .collect()
}

#[test]
fn test_stitch_runs_against_stand_in_dump() {
    let work = tempfile::tempdir().expect("tempdir");
    let scratch = tempfile::tempdir().expect("tempdir");
    let rrd_file = work.path().join("eth0.rrd");
    let csv_file = work.path().join("eth0.csv");

    // A failing dump reports its status and leaves nothing behind.
    std::fs::write(&rrd_file, "ignored").expect("write rrd");
    let failing = cli(Path::new("false"), &rrd_file, &csv_file, scratch.path());
    let result = execute(&failing);
    assert!(matches!(
        result,
        Err(StitchError::DumpFailed { status: Some(1) })
    ));
    assert!(!csv_file.exists());
    assert_eq!(entries(scratch.path()), 0);

    let script: PathBuf = work.path().join("fake-rrdtool");
    std::fs::write(&script, STAND_IN).expect("write script");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
    let run = cli(&script, &rrd_file, &csv_file, scratch.path());

    // First run: fresh file with header.
    std::fs::write(
        &rrd_file,
        dump(&[
            (1, vec![(250, 9.0), (260, 10.0)]),
            (12, vec![(100, 1.0), (200, 2.0), (300, 3.0)]),
        ]),
    )
    .expect("write rrd");
    let summary = execute(&run).expect("first run");
    assert!(summary.header_written);
    assert_eq!(summary.stats.written, 4);
    let csv = std::fs::read_to_string(&csv_file).expect("read csv");
    assert!(csv.starts_with("EPOCH,DATETIME,INOCTETS_AVG,OUTOCTETS_AVG,INOCTETS_MAX,OUTOCTETS_MAX\n"));
    assert_eq!(epochs(&csv), vec![100, 200, 250, 260]);

    // Second run over a moved window appends only newer rows.
    std::fs::write(
        &rrd_file,
        dump(&[
            (1, vec![(260, 10.0), (270, 11.0)]),
            (12, vec![(200, 2.0), (300, 3.0)]),
        ]),
    )
    .expect("write rrd");
    let summary = execute(&run).expect("second run");
    assert!(!summary.header_written);
    assert_eq!(summary.threshold, Some(260));
    assert_eq!(summary.stats.written, 1);

    // Rerun is a no-op.
    let summary = execute(&run).expect("rerun");
    assert_eq!(summary.stats.written, 0);

    let csv = std::fs::read_to_string(&csv_file).expect("read csv");
    assert_eq!(epochs(&csv), vec![100, 200, 250, 260, 270]);
    assert_eq!(csv.matches("EPOCH").count(), 1);

    // A dump that is not XML fails without touching the output.
    std::fs::write(&rrd_file, "RRD\0binary").expect("write rrd");
    let result = execute(&run);
    assert!(matches!(result, Err(StitchError::TreeParse(_))));
    assert_eq!(std::fs::read_to_string(&csv_file).expect("read csv"), csv);

    assert_eq!(entries(scratch.path()), 0);
}
