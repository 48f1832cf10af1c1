use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use onto_curation::{
    CurationDocument, CurationService, EavFilterComposer, InMemoryMappingStore, MappingEdit,
    MappingStore, MappingsFilter, Page, PageRequest, load_catalog,
};
use onto_map::{FreeTextLookup, InMemoryTermIndex, SuggestionRanker, TermScorer, TermSimilarity};
use onto_model::{
    EntityId, EntityType, EntityTypeRegistry, MappingEntity, Suggestion, eq_ignore_case, fold_case,
};
use tracing::{info, info_span};

use crate::cli::{EditArgs, LookupArgs, SearchArgs, SuggestArgs, TypesArgs};
use crate::config::AppConfig;
use crate::types::{EditResult, SuggestResult, SuggestionRow};

pub fn run_suggest(args: &SuggestArgs, config: &AppConfig) -> Result<SuggestResult> {
    let span = info_span!("suggest", document = %args.document.display());
    let _guard = span.enter();

    let document = CurationDocument::load(&args.document).context("load curation document")?;
    let catalog = load_catalog(&args.catalog).context("load ontology catalog")?;
    let entity_types = document.entity_types.clone();
    let mut service = open_service(document, config)?;

    let selected = selected_types(service.types(), &args.entity_types)?;
    let mut refreshed = 0;
    for name in &selected {
        refreshed += service
            .refresh_suggestions(name, &catalog)
            .with_context(|| format!("rank suggestions for {name}"))?;
    }

    let store = service.into_store();
    let registry = registry_of(&entity_types)?;
    let rows = store
        .iter()
        .filter(|e| selected.iter().any(|name| eq_ignore_case(name, &e.entity_type)))
        .map(|e| suggestion_row(e, &registry))
        .collect();

    let written = !args.dry_run;
    if written {
        CurationDocument::from_store(entity_types, &store)
            .save(&args.document)
            .context("save curation document")?;
    }
    info!(refreshed, written, "suggest finished");
    Ok(SuggestResult {
        document: args.document.clone(),
        refreshed,
        rows,
        written,
    })
}

pub fn run_edit(args: &EditArgs, config: &AppConfig) -> Result<EditResult> {
    let document = CurationDocument::load(&args.document).context("load curation document")?;
    let entity_types = document.entity_types.clone();
    let mut service = open_service(document, config)?;

    let id = EntityId::new(args.id);
    let current = service.store().load(id)?;
    let edit = edit_from_args(args, &current);
    let (entity, outcome) = service.update(id, &edit)?;

    let written = outcome.changed() && !args.dry_run;
    if written {
        CurationDocument::from_store(entity_types, service.store())
            .save(&args.document)
            .context("save curation document")?;
    }
    Ok(EditResult {
        entity,
        outcome,
        written,
    })
}

pub fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<Page<MappingEntity>> {
    let document = CurationDocument::load(&args.document).context("load curation document")?;
    let service = open_service(document, config)?;

    let mut filter = MappingsFilter {
        statuses: args.statuses.clone(),
        entity_type_names: args.entity_types.clone(),
        mapping_types: args.mapping_types.clone(),
        label: args.label.clone(),
        ..MappingsFilter::default()
    };
    for (key, value) in &args.values {
        filter = filter.with_values(key.clone(), [value.clone()]);
    }
    Ok(service.search(&filter, PageRequest::new(args.page, args.size))?)
}

pub fn run_lookup(args: &LookupArgs, config: &AppConfig) -> Result<Vec<Suggestion>> {
    let catalog = load_catalog(&args.catalog).context("load ontology catalog")?;
    let scorer = TermScorer::new(
        TermSimilarity::from_config(&config.similarity),
        config.similarity.perfect_match_score,
    );
    let lookup = FreeTextLookup::new(InMemoryTermIndex::new(scorer, catalog), &config.lookup);
    Ok(lookup.find(&args.input, &args.entity_type)?)
}

pub fn run_types(args: &TypesArgs) -> Result<Vec<EntityType>> {
    let document = CurationDocument::load(&args.document).context("load curation document")?;
    let mut types = document.entity_types;
    types.sort_by_key(|t| fold_case(&t.name));
    Ok(types)
}

fn open_service(
    document: CurationDocument,
    config: &AppConfig,
) -> Result<CurationService<InMemoryMappingStore>> {
    let (registry, store) = document.into_store()?;
    let ranker = SuggestionRanker::new(config.similarity.clone())?;
    Ok(CurationService::new(
        store,
        registry,
        EavFilterComposer::new(&config.search),
        ranker,
    ))
}

fn registry_of(entity_types: &[EntityType]) -> Result<EntityTypeRegistry> {
    Ok(EntityTypeRegistry::new(entity_types.iter().cloned())?)
}

/// Requested type names, or every defined type when none were requested.
fn selected_types(registry: &EntityTypeRegistry, requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(registry.iter().map(|t| t.name.clone()).collect());
    }
    let mut seen = BTreeSet::new();
    let mut selected = Vec::new();
    for name in requested {
        let Some(entity_type) = registry.get(name) else {
            bail!("unknown entity type: {name}");
        };
        if seen.insert(fold_case(&entity_type.name)) {
            selected.push(entity_type.name.clone());
        }
    }
    Ok(selected)
}

/// Edit from the command line. Term fields not given keep their current values.
fn edit_from_args(args: &EditArgs, current: &MappingEntity) -> MappingEdit {
    let mut edit = MappingEdit::status(args.status);
    match (&args.term_url, &args.term_label) {
        (Some(url), Some(label)) => {
            edit = edit.with_term(url.clone(), label.clone());
            edit.source = args.source;
            edit.mapping_type = args.mapping_type;
        }
        _ => {
            edit.mapped_term_url = current.mapped_term_url.clone();
            edit.mapped_term_label = current.mapped_term_label.clone();
            edit.source = args.source.or(current.source);
            edit.mapping_type = args.mapping_type.or(current.mapping_type);
        }
    }
    edit
}

fn suggestion_row(entity: &MappingEntity, registry: &EntityTypeRegistry) -> SuggestionRow {
    let values = registry
        .get(&entity.entity_type)
        .map(|t| {
            t.scoring_keys()
                .filter_map(|key| entity.value(key))
                .collect::<Vec<_>>()
                .join(" / ")
        })
        .unwrap_or_default();
    SuggestionRow {
        id: entity.id,
        entity_type: entity.entity_type.clone(),
        status: entity.status,
        values,
        best: entity.suggestions.first().cloned(),
        count: entity.suggestions.len(),
    }
}
