/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::error::Error;
use std::path::PathBuf;

use bpaf::Bpaf;
use solana_actions::codec::{encode_action_url, encode_blink_url, parse_url_str};
use solana_actions::wire::{Pubkey, Signature};
use solana_actions::{
    ActionClient, ActionRequestFields, ActionUrl, ActionsConfig, BlinkFields, CancelToken,
    HistoryOptions, ProtocolScheme, Reference,
};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
/// Work with Solana Action URLs, blinks and transaction references.
pub(crate) struct Options {
    /// TOML config file
    #[bpaf(long, short, argument("PATH"))]
    config: Option<PathBuf>,
    #[bpaf(external(command))]
    command: Command,
}

#[derive(Debug, Clone, Bpaf)]
pub(crate) enum Command {
    /// Decode an Action URL or blink and print its fields
    #[bpaf(command)]
    Parse {
        #[bpaf(positional("URL"))]
        url: String,
    },
    /// Build an Action URL, optionally wrapped in a blink
    #[bpaf(command)]
    Encode {
        /// HTTPS endpoint of the action provider
        #[bpaf(long, argument("URL"))]
        link: String,
        #[bpaf(long, argument("TEXT"))]
        label: Option<String>,
        #[bpaf(long, argument("TEXT"))]
        message: Option<String>,
        /// Web page to wrap the Action URL in
        #[bpaf(long, argument("URL"))]
        blink: Option<String>,
        /// solana, solana-action or solana-actions
        #[bpaf(long, argument("SCHEME"))]
        scheme: Option<String>,
    },
    /// Fetch and verify the transaction an Action URL points at
    #[bpaf(command)]
    Fetch {
        #[bpaf(positional("URL"))]
        url: String,
        /// Base58 account that will sign
        #[bpaf(long, argument("KEY"))]
        account: String,
    },
    /// Print the oldest transaction referencing KEY
    #[bpaf(command("find-reference"))]
    FindReference {
        #[bpaf(positional("KEY"))]
        reference: String,
        #[bpaf(long, argument("N"))]
        limit: Option<usize>,
        #[bpaf(long, argument("SIGNATURE"))]
        before: Option<String>,
        #[bpaf(long, argument("SIGNATURE"))]
        until: Option<String>,
    },
}

pub fn main() {
    init_tracing();
    let opts = options().run();
    if let Err(error) = run(opts) {
        log::debug!("{error:?}");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(opts: Options) -> Result<(), Box<dyn Error>> {
    let config = match &opts.config {
        Some(path) => ActionsConfig::load(path)?,
        None => ActionsConfig::default(),
    };

    match opts.command {
        Command::Parse { url } => print_url(&parse_url_str(&url)?),
        Command::Encode {
            link,
            label,
            message,
            blink,
            scheme,
        } => {
            let scheme = match scheme {
                Some(scheme) => scheme.parse::<ProtocolScheme>()?,
                None => config.default_scheme,
            };
            let mut fields = ActionRequestFields::new(Url::parse(&link)?);
            fields.label = label;
            fields.message = message;
            let encoded = match blink {
                Some(blink) => encode_blink_url(
                    &BlinkFields {
                        blink: Url::parse(&blink)?,
                        action: fields,
                    },
                    scheme,
                )?,
                None => encode_action_url(&fields, scheme)?,
            };
            println!("{encoded}");
        }
        Command::Fetch { url, account } => {
            let parsed = parse_url_str(&url)?;
            let account: Pubkey = account.parse()?;
            let client = ActionClient::from_config(&config)?;
            let cancel = CancelToken::new();

            let fetched = client.fetch_transaction(parsed.action(), &account, &cancel)?;
            if let Some(message) = &fetched.message {
                println!("message: {message}");
            }
            for (index, slot) in fetched.transaction.signature_slots().iter().enumerate() {
                let state = if slot.signature.is_some() { "signed" } else { "unsigned" };
                println!("signer {index}: {} ({state})", slot.signer);
            }
            println!("{}", fetched.transaction.to_base64()?);
        }
        Command::FindReference {
            reference,
            limit,
            before,
            until,
        } => {
            let reference: Reference = reference.parse()?;
            let options = HistoryOptions {
                limit,
                before: before.as_deref().map(str::parse::<Signature>).transpose()?,
                until: until.as_deref().map(str::parse::<Signature>).transpose()?,
                commitment: None,
            };
            let client = ActionClient::from_config(&config)?;
            let found = client.find_reference(&reference, &options, &CancelToken::new())?;
            let status = if found.succeeded() { "ok" } else { "failed" };
            println!("{} slot {} {status}", found.signature, found.slot);
        }
    }
    Ok(())
}

fn print_url(parsed: &ActionUrl) {
    if let ActionUrl::Blink(blink) = parsed {
        println!("blink:   {}", blink.blink);
    }
    let action = parsed.action();
    println!("link:    {}", action.link);
    println!("label:   {}", action.label.as_deref().unwrap_or_default());
    println!("message: {}", action.message.as_deref().unwrap_or_default());
}
