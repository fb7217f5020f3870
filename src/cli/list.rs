use table::{IntoTable, Table};
mod table;

use crate::cli::registry_or_die;
use crate::{die, ListArgs, ListObject, ListingFormat};

use contentreg::models::ModelKey;
use contentreg::schema::Timestamps;
use contentreg::sources::{SourceKind, Sources};
use contentreg::Registry;

#[derive(serde::Serialize)]
struct Model {
    key: String,
    connection: String,
    collection: String,
    increments: bool,
    timestamps: Timestamps,
}

impl From<Vec<Model>> for Table {
    fn from(value: Vec<Model>) -> Self {
        let mut tab = Table::with_header(vec![
            "KEY",
            "CONNECTION",
            "COLLECTION",
            "INCREMENTS",
            "TIMESTAMPS",
        ]);

        for model in value {
            tab.add_row(vec![
                model.key,
                model.connection,
                model.collection,
                if model.increments {
                    "yes".to_string()
                } else {
                    "no".to_string()
                },
                model.timestamps.to_string(),
            ]);
        }

        tab
    }
}

#[derive(serde::Serialize)]
struct Source {
    source: String,
    kind: SourceKind,
    models: usize,
}

impl From<Vec<Source>> for Table {
    fn from(value: Vec<Source>) -> Self {
        let mut tab = Table::with_header(vec!["SOURCE", "KIND", "MODELS"]);

        for source in value {
            tab.add_row(vec![
                source.source,
                source.kind.to_string(),
                source.models.to_string(),
            ]);
        }

        tab
    }
}

fn get_models(registry: &Registry, namespace: Option<&str>) -> Vec<Model> {
    registry
        .iter()
        .filter(|(key, _)| match namespace {
            Some(namespace) => ModelKey::parse(key).namespace == namespace,
            None => true,
        })
        .map(|(key, model)| {
            let schema = model.schema();

            Model {
                key: key.to_string(),
                connection: schema.connection.clone(),
                collection: schema.collection_name.clone(),
                increments: schema.options.increments,
                timestamps: schema.options.timestamps.clone(),
            }
        })
        .collect()
}

fn get_sources(sources: &Sources) -> Vec<Source> {
    sources
        .iter()
        .map(|(name, kind, source)| Source {
            source: name.to_string(),
            kind,
            models: source.model_count(),
        })
        .collect()
}

fn render<O: IntoTable + serde::Serialize>(object: O, format: ListingFormat) -> String {
    match format {
        ListingFormat::Json => match serde_json::to_string_pretty(&object) {
            Ok(output) => format!("{}\n", output),
            Err(err) => die!("failed to serialize listing: {}", err),
        },
        ListingFormat::Table => object.into_table().to_string(),
        ListingFormat::HeaderlessTable => {
            let mut tab = object.into_table();

            tab.print_header(false);

            tab.to_string()
        }
    }
}

pub(crate) fn list_cmd(args: &ListArgs, sources: &Sources) {
    let format = args.format;

    let output = match &args.object {
        ListObject::Models(args) => {
            let registry = registry_or_die(sources);
            let models = get_models(&registry, args.namespace.as_deref());

            render(models, format)
        }
        ListObject::Sources => render(get_sources(sources), format),
    };

    print!("{}", output);
}
