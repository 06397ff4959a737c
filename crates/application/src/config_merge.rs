use std::collections::BTreeMap;

use auberge_core::AppResult;
use auberge_domain::{
    BadgeVariant, ColumnDescriptor, ColumnKind, ComponentActions, ComponentConfig,
    ComponentConfigPatch, ComponentType, FieldDescriptor, FieldKind, SelectOption,
};

/// Default pagination window size shared by every component template.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Returns the built-in default configuration template for a component type.
///
/// The template is built fresh on every call; callers may mutate the result
/// without affecting later defaults.
pub fn default_config(component_type: ComponentType) -> AppResult<ComponentConfig> {
    match component_type {
        ComponentType::Form => ComponentConfig::new(
            default_form_fields()?,
            Vec::new(),
            Some("Nouvelle fiche".to_owned()),
            None,
            DEFAULT_PAGE_SIZE,
            ComponentActions::default(),
            None,
        ),
        ComponentType::Table => ComponentConfig::new(
            Vec::new(),
            default_table_columns()?,
            Some("Chambres".to_owned()),
            None,
            DEFAULT_PAGE_SIZE,
            ComponentActions::default(),
            Some("rooms".to_owned()),
        ),
        ComponentType::List => ComponentConfig::new(
            Vec::new(),
            default_list_columns()?,
            Some("Réservations".to_owned()),
            None,
            DEFAULT_PAGE_SIZE,
            ComponentActions::default(),
            Some("reservations".to_owned()),
        ),
        ComponentType::Dashboard => ComponentConfig::new(
            Vec::new(),
            Vec::new(),
            Some("Tableau de bord".to_owned()),
            Some("Indicateurs clés de l'établissement.".to_owned()),
            DEFAULT_PAGE_SIZE,
            ComponentActions::default(),
            None,
        ),
        ComponentType::Settings => ComponentConfig::new(
            Vec::new(),
            Vec::new(),
            Some("Paramètres".to_owned()),
            Some("Configuration de l'écran.".to_owned()),
            DEFAULT_PAGE_SIZE,
            ComponentActions::default(),
            None,
        ),
    }
}

/// Merges a stored partial configuration onto the type's default template.
///
/// Exactly two merge strategies exist: every top-level key present in the
/// patch shallow-replaces the default, except `actions`, which merges
/// key-wise so omitted flags keep their default instead of being dropped.
/// A stored page size of zero is treated as absent rather than an error.
/// The merge is idempotent: merging an already-merged configuration changes
/// nothing.
pub fn merge_config(
    component_type: ComponentType,
    stored: Option<&ComponentConfigPatch>,
) -> AppResult<ComponentConfig> {
    let defaults = default_config(component_type)?;
    let Some(patch) = stored else {
        return Ok(defaults);
    };

    let actions = patch
        .actions
        .map(|actions| actions.apply(*defaults.actions()))
        .unwrap_or(*defaults.actions());

    let page_size = match patch.page_size {
        Some(page_size) if page_size > 0 => page_size,
        _ => defaults.page_size(),
    };

    ComponentConfig::new(
        patch
            .fields
            .clone()
            .unwrap_or_else(|| defaults.fields().to_vec()),
        patch
            .columns
            .clone()
            .unwrap_or_else(|| defaults.columns().to_vec()),
        patch
            .title
            .clone()
            .or_else(|| defaults.title().map(str::to_owned)),
        patch
            .description
            .clone()
            .or_else(|| defaults.description().map(str::to_owned)),
        page_size,
        actions,
        patch
            .data_source
            .clone()
            .or_else(|| defaults.data_source().map(str::to_owned)),
    )
}

fn default_form_fields() -> AppResult<Vec<FieldDescriptor>> {
    Ok(vec![
        FieldDescriptor::new(
            "full_name",
            "Nom complet",
            FieldKind::Text,
            Some("Jean Dupont".to_owned()),
            true,
            Vec::new(),
            None,
            None,
            Some(2),
            Some(120),
            None,
        )?,
        FieldDescriptor::new(
            "email",
            "Email",
            FieldKind::Email,
            Some("jean.dupont@example.com".to_owned()),
            true,
            Vec::new(),
            None,
            None,
            None,
            None,
            None,
        )?,
        FieldDescriptor::new(
            "arrival_date",
            "Date d'arrivée",
            FieldKind::Date,
            None,
            true,
            Vec::new(),
            None,
            None,
            None,
            None,
            None,
        )?,
        FieldDescriptor::new(
            "nights",
            "Nuits",
            FieldKind::Number,
            None,
            true,
            Vec::new(),
            Some(1.0),
            Some(30.0),
            None,
            None,
            None,
        )?,
        FieldDescriptor::new(
            "room_type",
            "Type de chambre",
            FieldKind::Select,
            None,
            true,
            vec![
                SelectOption::new("single", "Simple")?,
                SelectOption::new("double", "Double")?,
                SelectOption::new("suite", "Suite")?,
            ],
            None,
            None,
            None,
            None,
            None,
        )?,
        FieldDescriptor::simple("breakfast", "Petit-déjeuner", FieldKind::Switch)?,
        FieldDescriptor::new(
            "notes",
            "Notes",
            FieldKind::Textarea,
            None,
            false,
            Vec::new(),
            None,
            None,
            None,
            Some(500),
            None,
        )?,
    ])
}

fn default_table_columns() -> AppResult<Vec<ColumnDescriptor>> {
    let mut status_variants = BTreeMap::new();
    status_variants.insert("available".to_owned(), BadgeVariant::Success);
    status_variants.insert("occupied".to_owned(), BadgeVariant::Destructive);
    status_variants.insert("maintenance".to_owned(), BadgeVariant::Warning);

    Ok(vec![
        ColumnDescriptor::new(
            "number",
            "Chambre",
            ColumnKind::Text,
            true,
            true,
            Some("90px".to_owned()),
            BTreeMap::new(),
        )?,
        ColumnDescriptor::simple("category", "Catégorie", ColumnKind::Text)?,
        ColumnDescriptor::simple("price_per_night", "Prix / nuit", ColumnKind::Number)?,
        ColumnDescriptor::new(
            "status",
            "Statut",
            ColumnKind::Badge,
            true,
            true,
            None,
            status_variants,
        )?,
        ColumnDescriptor::simple("updated_at", "Mise à jour", ColumnKind::Date)?,
        ColumnDescriptor::new(
            "actions",
            "Actions",
            ColumnKind::Actions,
            false,
            false,
            None,
            BTreeMap::new(),
        )?,
    ])
}

fn default_list_columns() -> AppResult<Vec<ColumnDescriptor>> {
    Ok(vec![
        ColumnDescriptor::simple("label", "Libellé", ColumnKind::Text)?,
        ColumnDescriptor::simple("status", "Statut", ColumnKind::Badge)?,
        ColumnDescriptor::simple("created_at", "Créée le", ColumnKind::Date)?,
        ColumnDescriptor::new(
            "actions",
            "Actions",
            ColumnKind::Actions,
            false,
            false,
            None,
            BTreeMap::new(),
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use auberge_domain::{ComponentActionsPatch, ComponentConfigPatch, ComponentType};
    use proptest::prelude::*;

    use super::{DEFAULT_PAGE_SIZE, default_config, merge_config};

    #[test]
    fn every_type_has_a_complete_template() {
        for component_type in [
            ComponentType::Form,
            ComponentType::Table,
            ComponentType::List,
            ComponentType::Dashboard,
            ComponentType::Settings,
        ] {
            let config = default_config(component_type);
            let config = match config {
                Ok(config) => config,
                Err(error) => panic!("template for {component_type:?} failed: {error}"),
            };
            assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
            assert!(config.actions().create());
            assert!(config.actions().export());
        }
    }

    #[test]
    fn form_template_has_fields_and_table_template_has_columns() {
        let form = default_config(ComponentType::Form);
        let table = default_config(ComponentType::Table);
        assert!(form.is_ok_and(|config| !config.fields().is_empty()));
        assert!(table.is_ok_and(|config| !config.columns().is_empty()));
    }

    #[test]
    fn missing_stored_config_yields_template_by_value() {
        let merged = merge_config(ComponentType::Form, None);
        let defaults = default_config(ComponentType::Form);
        assert_eq!(merged.ok(), defaults.ok());
    }

    #[test]
    fn stored_action_flags_merge_key_wise() {
        let patch = ComponentConfigPatch {
            actions: Some(ComponentActionsPatch {
                delete: Some(false),
                ..ComponentActionsPatch::default()
            }),
            ..ComponentConfigPatch::default()
        };

        let merged = merge_config(ComponentType::Form, Some(&patch));
        let merged = match merged {
            Ok(merged) => merged,
            Err(error) => panic!("merge failed: {error}"),
        };

        assert!(merged.actions().create());
        assert!(merged.actions().edit());
        assert!(!merged.actions().delete());
        assert!(merged.actions().view());
        assert!(merged.actions().export());

        let defaults = default_config(ComponentType::Form);
        assert_eq!(
            Some(merged.fields().to_vec()),
            defaults.map(|config| config.fields().to_vec()).ok()
        );
    }

    #[test]
    fn zero_stored_page_size_degrades_to_default() {
        let patch = ComponentConfigPatch {
            page_size: Some(0),
            ..ComponentConfigPatch::default()
        };
        let merged = merge_config(ComponentType::Table, Some(&patch));
        assert_eq!(merged.map(|config| config.page_size()).ok(), Some(DEFAULT_PAGE_SIZE));
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(
            title in proptest::option::of("[a-zA-Z ]{1,20}"),
            page_size in proptest::option::of(1usize..100),
            delete in proptest::option::of(any::<bool>()),
            export in proptest::option::of(any::<bool>()),
        ) {
            let patch = ComponentConfigPatch {
                title,
                page_size,
                actions: Some(auberge_domain::ComponentActionsPatch {
                    delete,
                    export,
                    ..Default::default()
                }),
                ..ComponentConfigPatch::default()
            };

            let once = merge_config(ComponentType::Table, Some(&patch));
            let once = match once {
                Ok(once) => once,
                Err(error) => panic!("merge failed: {error}"),
            };

            // Re-merging the fully merged config must change nothing.
            let remerge_patch = ComponentConfigPatch {
                fields: Some(once.fields().to_vec()),
                columns: Some(once.columns().to_vec()),
                title: once.title().map(str::to_owned),
                description: once.description().map(str::to_owned),
                page_size: Some(once.page_size()),
                actions: Some(auberge_domain::ComponentActionsPatch {
                    create: Some(once.actions().create()),
                    edit: Some(once.actions().edit()),
                    delete: Some(once.actions().delete()),
                    view: Some(once.actions().view()),
                    export: Some(once.actions().export()),
                }),
                data_source: once.data_source().map(str::to_owned),
            };
            let twice = merge_config(ComponentType::Table, Some(&remerge_patch));
            prop_assert_eq!(twice.ok(), Some(once));
        }
    }
}
