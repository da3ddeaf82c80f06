use std::io::Read;
use std::{env, fs, io};

use anyhow::{bail, Context};
use log::info;

use clausal::desugar::defun;
use clausal::interpreter::{Interpreter, InterpreterConfig};
use clausal::parse_source;

const USAGE: &str = "usage: clausal [--lift] [--dump] [--max-depth N] [file]";

struct Options {
    lift: bool,
    dump: bool,
    config: InterpreterConfig,
    file: Option<String>,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut options = Options {
        lift: false,
        dump: false,
        config: InterpreterConfig::default(),
        file: None,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lift" => options.lift = true,
            "--dump" => options.dump = true,
            "--max-depth" => {
                let value = args.next().context("--max-depth needs a value")?;
                options.config.max_depth = value
                    .parse()
                    .with_context(|| format!("invalid depth '{value}'"))?;
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'\n{USAGE}"),
            file => {
                if options.file.replace(file.to_string()).is_some() {
                    bail!("only one input file is supported\n{USAGE}");
                }
            }
        }
    }

    Ok(options)
}

fn read_source(file: Option<&str>) -> anyhow::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read '{path}'")),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read program from stdin")?;
            Ok(source)
        }
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    let source = read_source(options.file.as_deref())?;

    let mut program = parse_source(&source)?;
    if options.lift {
        program = defun(&program)?;
        info!("lambda lifting done");
    }

    if options.dump {
        println!("{program}");
        println!();
    }

    let interpreter = Interpreter::with_config(options.config);
    info!("evaluating with a depth limit of {}", interpreter.config().max_depth);
    let value = interpreter.run(&program)?;
    println!("{value}");

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    run(parse_args()?)
}
