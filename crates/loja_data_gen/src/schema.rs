//! Schema model for the store tables.
//!
//! Tables, columns and foreign keys are described as data and rendered to
//! DuckDB DDL. [`store_schema`] is the single definition of the persisted
//! layout; the table and column name constants below are what the storage
//! layer binds against.

use std::collections::HashMap;

pub const CUSTOMERS: &str = "clientes";
pub const PRODUCTS: &str = "produtos";
pub const CASHIERS: &str = "caixas";
pub const PAYMENT_METHODS: &str = "formas_pagamento";
pub const DELIVERY_STATUSES: &str = "status_entrega";
pub const SALES: &str = "vendas";

/// Reference tables, in the order the seeding driver fills them
pub const REFERENCE_TABLES: [&str; 5] = [
    CUSTOMERS,
    PRODUCTS,
    CASHIERS,
    PAYMENT_METHODS,
    DELIVERY_STATUSES,
];

/// SQL data types used by the store
#[derive(Debug, Clone, PartialEq)]
pub enum SqlType {
    /// Sequence-backed 64-bit identifier
    Identity,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    BigInt,
    /// Unlimited text
    Text,
    /// Double-precision float
    Double,
    /// Decimal with precision and scale
    Decimal(u8, u8),
    /// Date only
    Date,
}

impl SqlType {
    /// Returns the DuckDB type string
    pub fn to_duckdb(&self) -> String {
        match self {
            SqlType::Identity | SqlType::BigInt => "BIGINT".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::Text => "VARCHAR".to_string(),
            SqlType::Double => "DOUBLE".to_string(),
            SqlType::Decimal(p, s) => format!("DECIMAL({},{})", p, s),
            SqlType::Date => "DATE".to_string(),
        }
    }
}

/// Foreign key constraint
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub to_table: String,
    pub to_column: String,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub not_null: bool,
    pub primary_key: bool,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            not_null: false,
            primary_key: false,
            foreign_key: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            to_table: table.into(),
            to_column: column.into(),
        });
        self
    }
}

/// Table definition
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, col: Column) -> Self {
        self.columns.push(col);
        self
    }

    /// Get the primary key column name (assumes single-column PK)
    pub fn primary_key_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }

    /// Get all foreign key relationships
    pub fn foreign_keys(&self) -> Vec<(&str, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.foreign_key.as_ref().map(|fk| (c.name.as_str(), fk)))
            .collect()
    }

    /// Columns the caller supplies on insert (everything but the identity)
    pub fn insert_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.sql_type != SqlType::Identity)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Name of the sequence feeding the identity column
    pub fn sequence_name(&self) -> String {
        format!("{}_id_seq", self.name)
    }

    fn has_identity(&self) -> bool {
        self.columns.iter().any(|c| c.sql_type == SqlType::Identity)
    }

    /// DDL for this table, sequence first. Every statement is idempotent.
    pub fn to_duckdb_ddl(&self) -> Vec<String> {
        let mut statements = Vec::new();
        if self.has_identity() {
            statements.push(format!(
                "CREATE SEQUENCE IF NOT EXISTS {} START 1",
                self.sequence_name()
            ));
        }

        let mut defs: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("{} {}", c.name, c.sql_type.to_duckdb());
                if c.primary_key {
                    def.push_str(" PRIMARY KEY");
                } else if c.not_null {
                    def.push_str(" NOT NULL");
                }
                if c.sql_type == SqlType::Identity {
                    def.push_str(&format!(" DEFAULT nextval('{}')", self.sequence_name()));
                }
                def
            })
            .collect();

        for (column, fk) in self.foreign_keys() {
            defs.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                column, fk.to_table, fk.to_column
            ));
        }

        statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            defs.join(",\n    ")
        ));
        statements
    }
}

/// Complete schema definition
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
    table_index: HashMap<String, usize>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: Table) -> Self {
        let idx = self.tables.len();
        self.table_index.insert(table.name.clone(), idx);
        self.tables.push(table);
        self
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.table_index.get(name).map(|&idx| &self.tables[idx])
    }

    /// Get tables in topological order (dependencies first)
    pub fn tables_in_order(&self) -> Vec<&Table> {
        let mut visited = vec![false; self.tables.len()];
        let mut result = Vec::with_capacity(self.tables.len());

        fn visit<'a>(
            idx: usize,
            tables: &'a [Table],
            table_index: &HashMap<String, usize>,
            visited: &mut [bool],
            result: &mut Vec<&'a Table>,
        ) {
            if visited[idx] {
                return;
            }
            visited[idx] = true;

            for (_, fk) in tables[idx].foreign_keys() {
                if let Some(&dep_idx) = table_index.get(&fk.to_table) {
                    visit(dep_idx, tables, table_index, visited, result);
                }
            }

            result.push(&tables[idx]);
        }

        for idx in 0..self.tables.len() {
            visit(
                idx,
                &self.tables,
                &self.table_index,
                &mut visited,
                &mut result,
            );
        }

        result
    }
}

/// The six tables of the store
pub fn store_schema() -> Schema {
    Schema::new()
        .table(
            Table::new(SALES)
                .column(Column::new("id_venda", SqlType::Identity).primary_key())
                .column(
                    Column::new("id_cliente", SqlType::BigInt)
                        .not_null()
                        .references(CUSTOMERS, "id_cliente"),
                )
                .column(
                    Column::new("id_produto", SqlType::BigInt)
                        .not_null()
                        .references(PRODUCTS, "id_produto"),
                )
                .column(Column::new("data_venda", SqlType::Date).not_null())
                .column(Column::new("valor_venda", SqlType::Decimal(12, 2)).not_null())
                .column(Column::new("quantidade", SqlType::Integer).not_null())
                .column(
                    Column::new("id_forma_pagamento", SqlType::BigInt)
                        .not_null()
                        .references(PAYMENT_METHODS, "id_forma_pagamento"),
                )
                .column(
                    Column::new("id_status_entrega", SqlType::BigInt)
                        .not_null()
                        .references(DELIVERY_STATUSES, "id_status_entrega"),
                )
                .column(Column::new("data_entrega", SqlType::Date))
                .column(
                    Column::new("id_caixa", SqlType::BigInt)
                        .not_null()
                        .references(CASHIERS, "id_caixa"),
                ),
        )
        .table(
            Table::new(CUSTOMERS)
                .column(Column::new("id_cliente", SqlType::Identity).primary_key())
                .column(Column::new("nome", SqlType::Text).not_null())
                .column(Column::new("cpf_cnpj", SqlType::Text).not_null())
                .column(Column::new("endereco", SqlType::Text))
                .column(Column::new("telefone", SqlType::Text))
                .column(Column::new("email", SqlType::Text))
                .column(Column::new("segmento", SqlType::Text).not_null())
                .column(Column::new("canal_compra", SqlType::Text).not_null()),
        )
        .table(
            Table::new(PRODUCTS)
                .column(Column::new("id_produto", SqlType::Identity).primary_key())
                .column(Column::new("descricao", SqlType::Text).not_null())
                .column(Column::new("categoria", SqlType::Text).not_null())
                .column(Column::new("preco_unitario", SqlType::Decimal(10, 2)).not_null())
                .column(Column::new("peso_sazonal", SqlType::Double).not_null())
                .column(Column::new("unidade_medida", SqlType::Text).not_null()),
        )
        .table(
            Table::new(CASHIERS)
                .column(Column::new("id_caixa", SqlType::Identity).primary_key())
                .column(Column::new("nome", SqlType::Text).not_null())
                .column(Column::new("funcao", SqlType::Text).not_null())
                .column(Column::new("data_admissao", SqlType::Date).not_null()),
        )
        .table(
            Table::new(PAYMENT_METHODS)
                .column(Column::new("id_forma_pagamento", SqlType::Identity).primary_key())
                .column(Column::new("descricao", SqlType::Text).not_null())
                .column(Column::new("prazo_pagamento", SqlType::Integer).not_null())
                .column(Column::new("desconto", SqlType::Double).not_null()),
        )
        .table(
            Table::new(DELIVERY_STATUSES)
                .column(Column::new("id_status_entrega", SqlType::Identity).primary_key())
                .column(Column::new("descricao", SqlType::Text).not_null()),
        )
}
