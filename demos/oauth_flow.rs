use elvanto_api::{
    api::{ApiResult, ElvantoClient},
    oauth2::{self, credentials::Credentials},
};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
#[structopt(name = "oauth_flow", about = "walk through the Elvanto oauth flow")]
enum Opt {
    /// Print the url users should be redirected to
    Authorize {
        client_id: String,
        redirect_uri: String,
        #[structopt(long, default_value = "AdministerAccount")]
        scope: String,
        #[structopt(long)]
        state: Option<String>,
    },
    /// Exchange the code received on the redirect uri for a token
    Exchange {
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        code: String,
    },
    /// Refresh the token found in ELVANTO_ACCESS_TOKEN/ELVANTO_REFRESH_TOKEN
    Refresh,
}

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Opt::from_args() {
        Opt::Authorize {
            client_id,
            redirect_uri,
            scope,
            state,
        } => {
            let url = oauth2::authorize_url(&client_id, &redirect_uri, &scope, state.as_deref());
            println!("{}", url);
        }
        Opt::Exchange {
            client_id,
            client_secret,
            redirect_uri,
            code,
        } => {
            let client = ElvantoClient::no_auth()?;
            let token = client
                .exchange_token(&client_id, &client_secret, &redirect_uri, &code)
                .await?;
            println!("{:?}", token);
        }
        Opt::Refresh => {
            let client = ElvantoClient::new(Credentials::from_env()?)?;
            let token = client.refresh_token().await?;
            println!("{:?}", token);
        }
    }
    Ok(())
}
