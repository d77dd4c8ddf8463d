use std::error::Error;
use clap::Parser;
use ledger_keys::tool::Tool;

fn main() -> Result<(), Box<dyn Error>> {
    let mut tool = Tool::parse();
    if tool.output == "stdout" && tool.mode == "sign" {
        tool.silent = true;
    }
    if !tool.silent { println!("Run args: {:?}", tool); }
    tool.run()?;
    Ok(())
}
