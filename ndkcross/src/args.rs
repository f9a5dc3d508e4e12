use clap::Parser;

#[derive(Parser, Debug)]
#[clap(version)]
pub struct Args {
    #[clap(index = 1)]
    pub abis: Vec<String>
}

pub fn parse() -> Args {
    Args::parse()
}
