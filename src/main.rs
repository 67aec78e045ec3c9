//! `presetdb` - query a preset catalog from the command line.
//!
//! ```text
//! presetdb <presets.json> [--nsi <nsi.json>] [--config <presets.yaml>] <command>
//!
//! commands:
//!   match <geometry> key=value...   best preset for an object
//!   search <text> [country]         presets whose id, name or terms contain text
//!   inherit <id>                    name, icon and fields resolved up the id chain
//! ```
//!
//! Logging goes to stderr and is controlled by `PRESETDB_LOG` (default
//! `info`). Set `PRESETDB_LOG_FORMAT=json` for JSON lines.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use presetdb::{
    Catalog, Geometry, Matcher, PresetsConfig, SearchQuery, TagMap, inherit, search_with_config,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: presetdb <presets.json> [--nsi <nsi.json>] [--config <presets.yaml>] \
<match <geometry> key=value... | search <text> [country] | inherit <id>>";

struct Args {
    presets: PathBuf,
    nsi: Option<PathBuf>,
    config: Option<PathBuf>,
    command: Command,
}

enum Command {
    Match { geometry: Geometry, tags: TagMap },
    Search { text: String, country: Option<String> },
    Inherit { id: String },
}

fn main() -> Result<()> {
    init_tracing();

    let args = parse_args(env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => PresetsConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PresetsConfig::default(),
    };

    let primary = fs::read_to_string(&args.presets)
        .with_context(|| format!("reading {}", args.presets.display()))?;
    let supplemental = args
        .nsi
        .as_ref()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        })
        .transpose()?;
    let catalog = Catalog::from_json_str(&primary, supplemental.as_deref())
        .context("building preset catalog")?;

    match args.command {
        Command::Match { geometry, tags } => {
            let matcher = Matcher::with_config(&catalog, config.matcher_config());
            match matcher.best_match_scored(&tags, geometry, config.matcher.include_supplemental) {
                Some(outcome) => println!(
                    "{}\t{}\t{:.2}",
                    outcome.feature.id(),
                    outcome.feature.friendly_name(),
                    outcome.score
                ),
                None => println!("no matching preset"),
            }
        }
        Command::Search { text, country } => {
            let query = SearchQuery {
                text: Some(text),
                country,
            };
            let mut hits = search_with_config(&catalog, &query, &config.search_config());
            hits.sort_by(|a, b| a.id().cmp(b.id()));
            for feature in &hits {
                println!("{}\t{}", feature.id(), feature.friendly_name());
            }
            tracing::info!(hits = hits.len(), "search finished");
        }
        Command::Inherit { id } => {
            if catalog.get(&id).is_none() {
                bail!("no preset with id `{id}`");
            }
            let name = inherit::inherited_name(&catalog, &id).unwrap_or("-");
            let icon = inherit::inherited_icon(&catalog, &id).unwrap_or("-");
            let fields = inherit::inherited_fields(&catalog, &id)
                .map(|fields| fields.join(","))
                .unwrap_or_else(|| "-".to_string());
            println!("name\t{name}\nicon\t{icon}\nfields\t{fields}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PRESETDB_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if env::var("PRESETDB_LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut presets = None;
    let mut nsi = None;
    let mut config = None;
    let mut rest = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--nsi" => nsi = Some(PathBuf::from(args.next().context("--nsi needs a path")?)),
            "--config" => {
                config = Some(PathBuf::from(args.next().context("--config needs a path")?))
            }
            "-h" | "--help" => bail!(USAGE),
            _ if presets.is_none() => presets = Some(PathBuf::from(arg)),
            _ => rest.push(arg),
        }
    }

    let Some(presets) = presets else {
        bail!(USAGE);
    };
    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        Some("match") => {
            let geometry = rest
                .next()
                .context("match needs a geometry")?
                .parse::<Geometry>()?;
            let mut tags = TagMap::new();
            for pair in rest {
                let Some((key, value)) = pair.split_once('=') else {
                    bail!("expected key=value, got `{pair}`");
                };
                tags.insert(key.to_string(), value.to_string());
            }
            Command::Match { geometry, tags }
        }
        Some("search") => Command::Search {
            text: rest.next().context("search needs text")?,
            country: rest.next(),
        },
        Some("inherit") => Command::Inherit {
            id: rest.next().context("inherit needs a preset id")?,
        },
        Some(other) => bail!("unknown command `{other}`\n{USAGE}"),
        None => bail!(USAGE),
    };

    Ok(Args {
        presets,
        nsi,
        config,
        command,
    })
}
