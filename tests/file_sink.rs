// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::fs::OpenOptions;
use std::io::BufWriter;

use logtag::Config;
use logtag::Sink;
use logtag::Tags;
use tempfile::TempDir;

#[test]
fn lines_are_appended_to_a_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("sas.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .unwrap();

    let logger = Config::new()
        .name("sas")
        .prefix("SAS:")
        .sink(Sink::new(file))
        .system_tag("request_id", "1234")
        .build();
    let child = logger.derive(Config::new().app_tag("app", "app"));

    logger.info("first", None).unwrap();
    child
        .error("second", Some(&Tags::from([("per-call", "per-call")])))
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(content.ends_with('\n'));
    assert!(lines[0].ends_with(r#" INFO sas "first" request_id="1234""#));
    assert!(lines[1].ends_with(
        r#" ERROR sas "second" request_id="1234" SAS:.app="app" SAS:.per-call="per-call""#
    ));
}

#[test]
fn flush_reaches_buffered_writers() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("buffered.log");
    let file = fs::File::create(&path).unwrap();

    let logger = Config::new()
        .name("sas")
        .sink(Sink::new(BufWriter::new(file)))
        .build();

    logger.debug("buffered", None).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    logger.flush().unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.ends_with(" DEBUG sas \"buffered\"\n"));
}
