use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GRAY: &[u8] = b"P2\n4 2\n255\n0 64 128 255\n10 20 30 40\n";
const COLOR: &[u8] = b"P3\n2 2\n255\n255 0 0 0 255 0\n0 0 255 9 9 9\n";

fn pnmedit() -> Command {
    Command::cargo_bin("pnmedit").unwrap()
}

fn fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn outputs_tool_name() {
    pnmedit()
        .arg("-V")
        .assert()
        .success()
        .stdout("pnmedit 0.1.0\n");
}

#[test]
fn empty_script_succeeds() {
    pnmedit().write_stdin("").assert().success().stdout("");
}

#[test]
fn commands_without_image_report_and_continue() {
    pnmedit()
        .write_stdin("CROP\nFLIP\nEXIT\n")
        .assert()
        .success()
        .stdout("No image loaded\nInvalid command\nNo image loaded\n");
}

#[test]
fn histogram_of_loaded_image() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "in.pgm", GRAY);

    pnmedit()
        .write_stdin(format!("LOAD {input}\nHISTOGRAM 4 2\nEXIT\n"))
        .assert()
        .success()
        .stdout(format!("Loaded {input}\n4\t|\t****\n1\t|\t*\n"));
}

#[test]
fn rotate_and_save_ascii() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "in.ppm", COLOR);
    let output = dir.path().join("out.ppm");
    let output = output.to_string_lossy().into_owned();

    pnmedit()
        .write_stdin(format!(
            "LOAD {input}\nROTATE 90\nSAVE {output} ascii\nEXIT\n"
        ))
        .assert()
        .success()
        .stdout(format!("Loaded {input}\nRotated 90\nSaved {output}\n"));

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, "P3\n2 2\n255\n0 0 255 255 0 0\n9 9 9 0 255 0\n");
}

#[test]
fn saved_binary_reloads() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "in.pgm", GRAY);
    let output = dir.path().join("out.pgm");
    let output = output.to_string_lossy().into_owned();

    pnmedit()
        .write_stdin(format!(
            "LOAD {input}\nSAVE {output}\nLOAD {output}\nSELECT 0 0 2 2\nCROP\nEXIT\n"
        ))
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Selected 0 0 2 2\nImage cropped\n"));

    assert!(std::fs::read(&output).unwrap().starts_with(b"P5\n4 2\n255\n"));
}

#[test]
fn non_utf8_line_does_not_end_session() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "in.pgm", GRAY);

    let mut script = format!("LOAD {input}\n").into_bytes();
    script.extend_from_slice(b"SAVE out\xff.pgm\nCROP\n");

    pnmedit()
        .write_stdin(script)
        .assert()
        .success()
        .stdout(format!(
            "Loaded {input}\nInvalid command\nImage cropped\n"
        ));
}

#[test]
fn runs_script_file() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "in.ppm", COLOR);
    let script = fixture(
        &dir,
        "script.txt",
        format!("LOAD {input}\nAPPLY EMBOSS\nEQUALIZE\nEXIT\n").as_bytes(),
    );

    pnmedit()
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("APPLY parameter invalid"))
        .stdout(predicate::str::contains("Black and white image needed"));
}

#[test]
fn missing_script_fails() {
    pnmedit()
        .arg("no_such_script.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read script"));
}

#[test]
fn verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "in.pgm", GRAY);

    pnmedit()
        .arg("-v")
        .write_stdin(format!("LOAD {input}\nEXIT\n"))
        .assert()
        .success()
        .stdout(format!("Loaded {input}\n"))
        .stderr(predicate::str::contains("loaded"));

    pnmedit()
        .arg("-q")
        .write_stdin("LOAD missing.pgm\n")
        .assert()
        .success()
        .stdout("Failed to load missing.pgm\n")
        .stderr("");
}
