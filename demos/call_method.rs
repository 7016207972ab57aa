use elvanto_api::{
    api::{ApiResult, ElvantoClient},
    oauth2::credentials::Credentials,
};
use serde_json::{Map, Value};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "call_method",
    about = "call an Elvanto api method and print the json response"
)]
struct Opt {
    /// Read credentials from the file named by ELVANTO_APPLICATION_CREDENTIALS instead of ELVANTO_API_KEY/ELVANTO_ACCESS_TOKEN
    #[structopt(short, long)]
    credentials_file: bool,

    /// Api method, for instance people/getAll
    #[structopt()]
    method: String,

    /// Parameters as key=value, values are parsed as json when possible (page=1, fields=["email"])
    #[structopt()]
    params: Vec<String>,
}

fn parse_params(params: &[String]) -> Map<String, Value> {
    params
        .iter()
        .filter_map(|p| p.split_once('='))
        .map(|(k, v)| {
            let v = serde_json::from_str(v).unwrap_or_else(|_| Value::String(v.to_owned()));
            (k.to_owned(), v)
        })
        .collect()
}

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opt = Opt::from_args();

    let credentials = if opt.credentials_file {
        Credentials::default().await?
    } else {
        Credentials::from_env()?
    };
    let client = ElvantoClient::new(credentials)?;

    let response = client
        .call(opt.method.as_str(), &parse_params(&opt.params))
        .await?;
    println!("{:#}", response);
    Ok(())
}
