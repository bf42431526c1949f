use proptest::prelude::*;
use std::collections::BTreeMap;

use schema_baseline::{convert, Config};

const TYPES: &[&str] = &[
    "integer",
    "bigint",
    "text",
    "boolean",
    "character varying(255)",
    "numeric(10,2)",
    "timestamp with time zone",
    "jsonb",
    "uuid",
];

#[derive(Debug, Clone)]
struct TableSpec {
    name: String,
    columns: Vec<(String, &'static str, bool)>,
    indexed: bool,
    has_parent: bool,
}

fn columns_strategy() -> impl Strategy<Value = Vec<(String, &'static str, bool)>> {
    prop::collection::btree_map("[a-z]{1,6}", (0..TYPES.len(), any::<bool>()), 0..6).prop_map(
        |columns: BTreeMap<String, (usize, bool)>| {
            columns
                .into_iter()
                .map(|(name, (ty, not_null))| (format!("c_{}", name), TYPES[ty], not_null))
                .collect()
        },
    )
}

fn schema_strategy() -> impl Strategy<Value = Vec<TableSpec>> {
    prop::collection::btree_map(
        "[a-z]{3,8}",
        (columns_strategy(), any::<bool>(), any::<bool>()),
        1..5,
    )
    .prop_map(|tables| {
        tables
            .into_iter()
            .map(|(name, (columns, indexed, has_parent))| TableSpec {
                name: format!("t_{}", name),
                columns,
                indexed,
                has_parent,
            })
            .collect()
    })
}

/// Render the tables the way pg_dump lays out a schema-only dump
fn render_dump(tables: &[TableSpec]) -> String {
    let root = &tables[0].name;
    let mut sql = String::from("SET statement_timeout = 0;\n\n");

    for table in tables {
        let mut lines = vec!["    id integer NOT NULL".to_string()];
        for (name, ty, not_null) in &table.columns {
            let suffix = if *not_null { " NOT NULL" } else { "" };
            lines.push(format!("    {} {}{}", name, ty, suffix));
        }
        if table.has_parent {
            lines.push("    parent_id integer".to_string());
        }
        sql.push_str(&format!(
            "CREATE TABLE public.{} (\n{}\n);\n\n",
            table.name,
            lines.join(",\n")
        ));
    }

    for table in tables {
        if table.indexed {
            sql.push_str(&format!(
                "CREATE INDEX {0}_id_index ON public.{0} USING btree (id);\n\n",
                table.name
            ));
        }
        if table.has_parent {
            sql.push_str(&format!(
                "ALTER TABLE ONLY public.{0}\n    ADD CONSTRAINT {0}_parent_id_foreign FOREIGN KEY (parent_id) REFERENCES public.{1}(id) ON DELETE SET NULL;\n\n",
                table.name, root
            ));
        }
    }

    sql
}

proptest! {
    #[test]
    fn verifier_agrees_with_extraction(tables in schema_strategy()) {
        let dump = render_dump(&tables);
        let conversion = convert(&dump, &Config::default()).unwrap();
        let verification = &conversion.verification;

        prop_assert!(verification.passed, "{}", verification);
        prop_assert!(verification.warnings.iter().all(|w| !w.starts_with("Dangling reference")));
        prop_assert_eq!(verification.statistics["tables"], tables.len());

        let columns: usize = tables
            .iter()
            .map(|t| 1 + t.columns.len() + usize::from(t.has_parent))
            .sum();
        prop_assert_eq!(verification.statistics["columns"], columns);
        prop_assert!(conversion.model.dangling_references().is_empty());
    }

    #[test]
    fn revert_is_reverse_of_apply(tables in schema_strategy()) {
        let conversion = convert(&render_dump(&tables), &Config::default()).unwrap();
        let migration = &conversion.migration;

        prop_assert_eq!(migration.up.len(), migration.down.len());
        for (up, down) in migration.up.iter().zip(migration.down.iter().rev()) {
            prop_assert_eq!(up.split('"').nth(1), down.split('"').nth(1));
        }
    }

    #[test]
    fn conversion_is_deterministic(tables in schema_strategy()) {
        let dump = render_dump(&tables);
        let first = convert(&dump, &Config::default()).unwrap();
        let second = convert(&dump, &Config::default()).unwrap();

        prop_assert_eq!(first.digest(), second.digest());
        prop_assert_eq!(&first.verification, &second.verification);
    }
}
