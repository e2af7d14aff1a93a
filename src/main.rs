// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/main.rs

// Command line entry point.

// <>

use tinyforth::tf::{self, dump, stack::TfStack};

use std::env;
use std::io::{self, BufReader};
use std::process;

fn main() {
    // RUST_LOG overrides the default level
    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
    {
        eprintln!("logger setup failed: {}", e);
    }

    // `tinyforth 5 10 add` runs its arguments as one program;
    // `tinyforth` alone runs standard input
    let args: Vec<String> = env::args().skip(1).collect();

    let mut stack = TfStack::new();
    let outcome = if args.is_empty() {
        tf::run_stream(&mut stack, BufReader::new(io::stdin().lock()))
    } else {
        tf::run_args(&mut stack, &args)
    };

    log::debug!("stack bytes: {}", dump::hex(&stack));
    print!("{}", dump::stack_listing(&stack));

    if outcome.is_err() {
        process::exit(1);
    }
}
