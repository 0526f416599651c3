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

use std::collections::HashSet;

use logtag::Config;
use logtag::Sink;
use logtag::Tags;
use logtag::sink::Buffer;

const THREADS: usize = 8;
const LINES_PER_THREAD: usize = 250;

#[test]
fn derived_loggers_never_interleave_lines() {
    let buffer = Buffer::new();
    let root = Config::new()
        .name("root")
        .sink(Sink::new(buffer.clone()))
        .system_tag("service", "svc")
        .build();

    std::thread::scope(|s| {
        for t in 0..THREADS {
            let worker = root.derive(
                Config::new()
                    .name(format!("worker-{t}"))
                    .app_tag("thread", t.to_string()),
            );
            s.spawn(move || {
                for i in 0..LINES_PER_THREAD {
                    let call = Tags::from([("seq", i.to_string())]);
                    worker.info(&format!("message {i}"), Some(&call)).unwrap();
                }
            });
        }
    });

    let mut expected = HashSet::new();
    for t in 0..THREADS {
        for i in 0..LINES_PER_THREAD {
            expected.insert(format!(
                r#" INFO worker-{t} "message {i}" service="svc" thread="{t}" seq="{i}""#
            ));
        }
    }

    let lines = buffer.lines();
    assert_eq!(lines.len(), THREADS * LINES_PER_THREAD);
    for line in lines {
        // strip the `YYYY-MM-DD HH:MM:SS.mmm` timestamp
        let (timestamp, rest) = line.split_at(23);
        assert_eq!(timestamp.len(), 23);
        assert!(expected.remove(rest), "unexpected line: {line}");
    }
    assert!(expected.is_empty());
}
