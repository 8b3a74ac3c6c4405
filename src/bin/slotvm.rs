// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::error::Error;
use std::fs;
use std::io;

use clap::{arg, Arg, ArgMatches, Command};
use log::{error, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use slotvm::vm::{disassemble, format_listing, Vm};

fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("slotvm")
        .about("Stack-based bytecode VM")
        .version("0.1.0")
        .subcommand_required(true)
        .arg(arg!(--verbose "Show verbose output"))
        .subcommand(
            Command::new("run")
                .about("Run a bytecode program against stdin/stdout")
                .arg(Arg::new("file").required(true))
                .visible_alias("r"),
        )
        .subcommand(
            Command::new("disasm")
                .about("Print a decode-only instruction listing")
                .arg(Arg::new("file").required(true))
                .visible_alias("d"),
        )
        .get_matches();

    let verbose = matches.is_present("verbose");
    init_logging(if verbose { LevelFilter::Info } else { LevelFilter::Warn });

    let ok = match matches.subcommand() {
        Some(("run", args)) => run(args),
        Some(("disasm", args)) => disasm(args),
        _ => unreachable!(),
    }?;

    std::process::exit(if ok { 0 } else { 1 });
}

/// Run a program file against process stdin/stdout.
fn run(args: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let filename = args.get_one::<String>("file").unwrap();
    let program = fs::read(filename)?;
    let mut vm = Vm::new(&program, io::stdin(), io::stdout());
    match vm.run() {
        Ok(()) => Ok(true),
        Err(fault) => {
            error!("{}", fault);
            Ok(false)
        }
    }
}

/// Print a decode-only listing of a program file.
fn disasm(args: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let filename = args.get_one::<String>("file").unwrap();
    let program = fs::read(filename)?;
    let (listing, err) = disassemble(&program);
    print!("{}", format_listing(&listing));
    match err {
        None => Ok(true),
        Some(e) => {
            error!("{}", e);
            Ok(false)
        }
    }
}

fn init_logging(level: LevelFilter) {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();
    let _ = log4rs::init_config(config);
}
