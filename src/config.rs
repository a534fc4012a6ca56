use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://api.x.ai/v1/completions";
pub const DEFAULT_OUTPUT_FILE: &str = "prompt_output.json";

#[derive(Debug, Clone, Parser)]
#[clap(
    name = "promptrefine",
    version = "0.1.0",
    author = "Timothy Bogdala",
    about = "Refines a prompt through an LLM completion API and prints it as a JSON document. \
             The API key and the prompt are read interactively from STDIN."
)]
pub struct Config {
    #[clap(
        long("api"),
        value_name = "URL",
        help = "The completion endpoint URL to use.",
        default_value = DEFAULT_ENDPOINT
    )]
    pub endpoint: String,

    #[clap(
        short('n'),
        long,
        value_name = "INT",
        help = "Sets the maximum number of tokens to generate for the refined prompt",
        default_value_t = 200
    )]
    pub max_tokens: u32,

    #[clap(
        long,
        value_name = "F64",
        help = "Sets the temperature for sampling",
        default_value_t = 0.7
    )]
    pub temp: f64,

    #[clap(
        long,
        value_name = "MODEL_ID",
        help = "Sets the model to request; omitted from the request when absent"
    )]
    pub model_id: Option<String>,

    #[clap(
        short('o'),
        long,
        value_name = "PATH",
        help = "The file the JSON document is written to when saving is confirmed",
        default_value = DEFAULT_OUTPUT_FILE
    )]
    pub output: PathBuf,

    #[clap(
        short('v'),
        long,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,
}

impl Config {
    pub fn from_cli() -> Self {
        Config::parse()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_tokens: 200,
            temp: 0.7,
            model_id: None,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            verbose: 0,
        }
    }
}
