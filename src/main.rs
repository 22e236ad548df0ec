use anyhow::{Context, Result};
use getargv::QueryOptions;
use std::io::Write as _;

fn usage() {
    let name = std::env::args().next().unwrap_or_else(|| "getargv".into());
    eprintln!("Usage: {name} [-0] [-s <skip>] <pid>");
    eprintln!();
    eprintln!("Print the arguments of a running process.");
    eprintln!("  -0         separate arguments with NUL bytes instead of spaces");
    eprintln!("  -s <skip>  leave out the first <skip> arguments");
}

fn parse_args() -> Result<Option<QueryOptions>> {
    let mut nuls = false;
    let mut skip = 0;
    let mut pid = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-0" => nuls = true,
            "-s" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("-s needs a value"))?;
                skip = value
                    .parse()
                    .with_context(|| format!("invalid skip count {value:?}"))?;
            }
            _ if pid.is_none() => {
                pid = Some(
                    arg.parse()
                        .with_context(|| format!("invalid pid {arg:?}"))?,
                );
            }
            _ => return Err(anyhow::anyhow!("unexpected argument {arg:?}")),
        }
    }
    let pid = pid.ok_or_else(|| anyhow::anyhow!("missing pid"))?;
    Ok(Some(
        QueryOptions::new(pid).with_skip(skip).with_nuls(nuls),
    ))
}

fn main() -> Result<()> {
    env_logger::init();
    let options = match parse_args() {
        Ok(Some(options)) => options,
        Ok(None) => {
            usage();
            return Ok(());
        }
        Err(e) => {
            usage();
            return Err(e);
        }
    };
    log::info!("reading arguments of process {}", options.pid);
    let region = getargv::argv_of_pid(&options)
        .with_context(|| format!("cannot read the arguments of process {}", options.pid))?;
    let mut stdout = std::io::stdout().lock();
    region.render(&mut stdout, options.nuls)?;
    if !options.nuls {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}
