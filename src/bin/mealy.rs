// Copyright (c) 2021 Fabian Schuiki

//! A compiler for guarded register-transfer specifications.

use clap::{App, Arg};
use log::info;
use std::{fs, str::FromStr};

fn main() {
    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("A compiler for guarded register-transfer specifications.")
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help("Increase message verbosity"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .help("Silence all output"),
        )
        .arg(
            Arg::with_name("timestamp")
                .short("t")
                .help("prepend log lines with a timestamp")
                .takes_value(true)
                .possible_values(&["none", "sec", "ms", "ns"]),
        )
        .arg(
            Arg::with_name("dump_ast")
                .long("dump-ast")
                .help("Dump the parsed program"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Write the IR to FILE instead of <INPUT>.ir; `-` for stdout")
                .takes_value(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("The spec file to compile")
                .required(true),
        )
        .get_matches();

    // Configure the logger.
    let verbose = matches.occurrences_of("verbosity") as usize + 1;
    let quiet = matches.is_present("quiet");
    let ts = matches
        .value_of("timestamp")
        .map(|v| {
            stderrlog::Timestamp::from_str(v).unwrap_or_else(|_| {
                clap::Error {
                    message: "invalid value for 'timestamp'".into(),
                    kind: clap::ErrorKind::InvalidValue,
                    info: None,
                }
                .exit()
            })
        })
        .unwrap_or(stderrlog::Timestamp::Off);

    stderrlog::new()
        .quiet(quiet)
        .verbosity(verbose)
        .timestamp(ts)
        .init()
        .unwrap();

    // Read the spec file.
    let filename = matches.value_of("INPUT").unwrap();
    let text = match fs::read_to_string(filename) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Unable to read input file '{}': {}", filename, err);
            std::process::exit(1);
        }
    };

    // Parse the spec.
    let program = match mealy::spec::parse(&text) {
        Ok(program) => program,
        Err(diag) => {
            eprint!("{}", diag);
            std::process::exit(1);
        }
    };

    // Dump the program if so requested.
    if matches.is_present("dump_ast") {
        println!("{:#?}", program);
    }

    // Lower the program and emit the IR.
    let ir = match mealy::codegen::emit(&program) {
        Ok(ir) => ir,
        Err(diag) => {
            eprint!("{}", diag);
            std::process::exit(1);
        }
    };

    // Write the result.
    let output = matches
        .value_of("output")
        .map(String::from)
        .unwrap_or_else(|| format!("{}.ir", filename));
    if output == "-" {
        print!("{}", ir);
    } else {
        if let Err(err) = fs::write(&output, &ir) {
            eprintln!("Unable to write output file '{}': {}", output, err);
            std::process::exit(1);
        }
        info!("IR written to {}", output);
    }
}
