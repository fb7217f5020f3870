use super::registry::{create_manager, Error, ModelInfo, Registry};

use crate::models::{ModelKey, ADMIN_NAMESPACE};
use crate::sources::{Source, Sources};

fn push_models(infos: &mut Vec<ModelInfo>, namespace: &str, source: &Source) {
    let models = match &source.models {
        Some(models) => models,
        None => return,
    };

    for (model, schema) in models.iter() {
        infos.push(ModelInfo::new(
            ModelKey::new(namespace, model).to_string(),
            schema.clone(),
        ));
    }
}

/// Flatten every source into namespaced model declarations.
///
/// Plugins come first, then the admin area, then APIs. The registry keeps the
/// last declaration of a key, so an API model shadows an admin or plugin model
/// of the same key, and an admin model shadows a plugin model.
pub fn collect_model_infos(sources: &Sources) -> Vec<ModelInfo> {
    let mut infos = Vec::new();

    for (plugin, source) in sources.plugins.iter() {
        push_models(&mut infos, plugin, source);
    }

    push_models(&mut infos, ADMIN_NAMESPACE, &sources.admin);

    for (api, source) in sources.api.iter() {
        push_models(&mut infos, api, source);
    }

    infos
}

/// Build the registry of every model declared by `sources`
pub fn build_models_manager(sources: &Sources) -> Result<Registry, Error> {
    create_manager(collect_model_infos(sources))
}
