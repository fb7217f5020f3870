use crate::cli::registry_or_die;
use crate::{die, ShowArgs};

use contentreg::registry::relations::{Reference, Relation};
use contentreg::sources::Sources;
use contentreg::Registry;
use serde_json::Value;

/// Everything known about a single model
#[derive(serde::Serialize, Debug)]
struct ModelDetails<'r> {
    key: &'r str,
    schema: &'r Value,
    relations: &'r [Relation],
    referrers: Vec<&'r Reference>,
    reachable: Vec<&'r str>,
}

fn model_details<'r>(registry: &'r Registry, key: &'r str) -> Option<ModelDetails<'r>> {
    let model = registry.get(key)?;

    Some(ModelDetails {
        key,
        schema: &model.schema().raw,
        relations: registry.relations(key),
        referrers: registry.referrers(key).collect(),
        reachable: registry.reachable(key),
    })
}

pub(crate) fn show_cmd(args: &ShowArgs, sources: &Sources) {
    let registry = registry_or_die(sources);

    let details = match model_details(&registry, &args.key) {
        Some(details) => details,
        None => die!("model \"{}\" is not registered", args.key),
    };

    match serde_json::to_string_pretty(&details) {
        Ok(output) => println!("{}", output),
        Err(err) => die!("failed to serialize model \"{}\": {}", args.key, err),
    }
}
