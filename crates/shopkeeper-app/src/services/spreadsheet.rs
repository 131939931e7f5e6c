//! # Spreadsheet Service
//!
//! CSV import/export for the product catalogue and the client registry.
//!
//! ## File Shape
//! Exports write canonical English headers. Imports are forgiving: headers
//! are matched case-insensitively and common Spanish column names are
//! accepted as aliases, so a sheet kept in either language round-trips.
//!
//! A row with an `id` overwrites that record; a row without one creates a
//! new record. Bad cells fail the whole import with the offending row
//! number - a half-imported sheet is worse than a rejected one.

use std::io::{Read, Write};

use shopkeeper_core::validation::{
    parse_i64, validate_client_input, validate_product_input,
};
use shopkeeper_core::{ClientInput, ProductInput};
use shopkeeper_db::Database;
use tracing::info;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Header Resolution
// =============================================================================

/// Finds a column by its canonical name or any alias, case-insensitively.
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        names.iter().any(|n| h == *n)
    })
}

/// Like [`find_column`], but required.
fn require_column(headers: &csv::StringRecord, names: &[&str]) -> ApiResult<usize> {
    find_column(headers, names)
        .ok_or_else(|| ApiError::validation(format!("missing column '{}'", names[0])))
}

/// Cell accessor; absent cells read as empty.
fn cell<'r>(record: &'r csv::StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or("").trim()
}

fn row_error(row: usize, err: impl std::fmt::Display) -> ApiError {
    ApiError::validation(format!("row {}: {}", row, err))
}

// =============================================================================
// Products
// =============================================================================

/// Writes the whole catalogue as CSV. Returns the number of rows written.
pub async fn export_products<W: Write>(db: &Database, writer: W) -> ApiResult<usize> {
    let products = db.products().list().await?;

    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "id",
        "name",
        "color",
        "stock",
        "cost_cents",
        "sale_price_cents",
        "image_url",
    ])?;

    for product in &products {
        let stock = product.stock.to_string();
        let cost = product.cost_cents.to_string();
        let price = product.sale_price_cents.to_string();
        out.write_record([
            product.id.as_str(),
            product.name.as_str(),
            product.color.as_str(),
            stock.as_str(),
            cost.as_str(),
            price.as_str(),
            product.image_url.as_deref().unwrap_or(""),
        ])?;
    }
    out.flush().map_err(|e| ApiError::internal(e.to_string()))?;

    info!(rows = products.len(), "catalogue exported");
    Ok(products.len())
}

/// Reads a CSV sheet into the catalogue. Returns the number of rows applied.
pub async fn import_products<R: Read>(db: &Database, reader: R) -> ApiResult<usize> {
    let mut input = csv::Reader::from_reader(reader);

    let headers = input.headers()?.clone();
    let id_col = find_column(&headers, &["id"]);
    let name_col = require_column(&headers, &["name", "nombre"])?;
    let color_col = require_column(&headers, &["color"])?;
    let stock_col = require_column(&headers, &["stock", "cantidad", "existencias"])?;
    let cost_col = require_column(&headers, &["cost_cents", "cost", "costo"])?;
    let price_col = require_column(&headers, &["sale_price_cents", "price", "precio"])?;
    let image_col = find_column(&headers, &["image_url", "imagen"]);

    let mut applied = 0usize;
    for (index, record) in input.records().enumerate() {
        let row = index + 2; // header is row 1
        let record = record?;

        let input = ProductInput {
            name: cell(&record, name_col).to_string(),
            color: cell(&record, color_col).to_string(),
            stock: parse_i64("stock", cell(&record, stock_col)).map_err(|e| row_error(row, e))?,
            cost_cents: parse_i64("cost", cell(&record, cost_col))
                .map_err(|e| row_error(row, e))?,
            sale_price_cents: parse_i64("sale price", cell(&record, price_col))
                .map_err(|e| row_error(row, e))?,
            image_url: image_col
                .map(|c| cell(&record, c))
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        };
        validate_product_input(&input).map_err(|e| row_error(row, e))?;

        let id = id_col
            .map(|c| cell(&record, c))
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        db.products().upsert(id, input).await?;
        applied += 1;
    }

    info!(rows = applied, "catalogue imported");
    Ok(applied)
}

// =============================================================================
// Clients
// =============================================================================

/// Writes the whole client registry as CSV. Returns the number of rows.
pub async fn export_clients<W: Write>(db: &Database, writer: W) -> ApiResult<usize> {
    let clients = db.clients().list().await?;

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["id", "name", "document_id", "phone", "address"])?;

    for client in &clients {
        out.write_record([
            client.id.as_str(),
            client.name.as_str(),
            client.document_id.as_str(),
            client.phone.as_str(),
            client.address.as_str(),
        ])?;
    }
    out.flush().map_err(|e| ApiError::internal(e.to_string()))?;

    info!(rows = clients.len(), "client registry exported");
    Ok(clients.len())
}

/// Reads a CSV sheet into the client registry. Returns the rows applied.
pub async fn import_clients<R: Read>(db: &Database, reader: R) -> ApiResult<usize> {
    let mut input = csv::Reader::from_reader(reader);

    let headers = input.headers()?.clone();
    let id_col = find_column(&headers, &["id"]);
    let name_col = require_column(&headers, &["name", "nombre"])?;
    let document_col = require_column(&headers, &["document_id", "documento", "cedula"])?;
    let phone_col = require_column(&headers, &["phone", "telefono"])?;
    let address_col = find_column(&headers, &["address", "direccion"]);

    let mut applied = 0usize;
    for (index, record) in input.records().enumerate() {
        let row = index + 2;
        let record = record?;

        let input = ClientInput {
            name: cell(&record, name_col).to_string(),
            document_id: cell(&record, document_col).to_string(),
            phone: cell(&record, phone_col).to_string(),
            address: address_col.map(|c| cell(&record, c)).unwrap_or("").to_string(),
        };
        validate_client_input(&input).map_err(|e| row_error(row, e))?;

        let id = id_col
            .map(|c| cell(&record, c))
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        db.clients().upsert(id, input).await?;
        applied += 1;
    }

    info!(rows = applied, "client registry imported");
    Ok(applied)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeeper_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_product_roundtrip() {
        let db = test_db().await;
        db.products()
            .upsert(
                None,
                ProductInput {
                    name: "Linen Shirt".to_string(),
                    color: "white".to_string(),
                    stock: 10,
                    cost_cents: 500,
                    sale_price_cents: 900,
                    image_url: None,
                },
            )
            .await
            .unwrap();

        let mut buffer = Vec::new();
        assert_eq!(export_products(&db, &mut buffer).await.unwrap(), 1);

        // Import into a fresh database: same rows, same ids.
        let other = test_db().await;
        assert_eq!(
            import_products(&other, buffer.as_slice()).await.unwrap(),
            1
        );

        let original = db.products().list().await.unwrap();
        let imported = other.products().list().await.unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].id, original[0].id);
        assert_eq!(imported[0].name, "Linen Shirt");
        assert_eq!(imported[0].stock, 10);
        assert_eq!(imported[0].sale_price_cents, 900);
    }

    #[tokio::test]
    async fn test_import_with_spanish_headers() {
        let db = test_db().await;
        let sheet = "nombre,color,cantidad,costo,precio\n\
                     Camisa de Lino,blanco,12,500,900\n";

        assert_eq!(import_products(&db, sheet.as_bytes()).await.unwrap(), 1);

        let products = db.products().list().await.unwrap();
        assert_eq!(products[0].name, "Camisa de Lino");
        assert_eq!(products[0].stock, 12);
    }

    #[tokio::test]
    async fn test_import_reuses_id_to_overwrite() {
        let db = test_db().await;
        let created = db
            .products()
            .upsert(
                None,
                ProductInput {
                    name: "Cap".to_string(),
                    color: "beige".to_string(),
                    stock: 5,
                    cost_cents: 100,
                    sale_price_cents: 300,
                    image_url: None,
                },
            )
            .await
            .unwrap();

        let sheet = format!(
            "id,name,color,stock,cost_cents,sale_price_cents\n{},Cap,beige,20,100,300\n",
            created.id
        );
        import_products(&db, sheet.as_bytes()).await.unwrap();

        assert_eq!(db.products().count().await.unwrap(), 1);
        assert_eq!(db.products().get(&created.id).await.unwrap().stock, 20);
    }

    #[tokio::test]
    async fn test_bad_cell_reports_row_number() {
        let db = test_db().await;
        let sheet = "name,color,stock,cost_cents,sale_price_cents\n\
                     Shirt,blue,10,500,900\n\
                     Cap,beige,plenty,100,300\n";

        let err = import_products(&db, sheet.as_bytes()).await.unwrap_err();
        assert!(err.message.contains("row 3"));
    }

    #[tokio::test]
    async fn test_missing_required_column() {
        let db = test_db().await;
        let sheet = "name,stock,cost_cents,sale_price_cents\nShirt,10,500,900\n";

        let err = import_products(&db, sheet.as_bytes()).await.unwrap_err();
        assert!(err.message.contains("color"));
    }

    #[tokio::test]
    async fn test_client_roundtrip_with_aliases() {
        let db = test_db().await;
        let sheet = "nombre,documento,telefono,direccion\n\
                     Maria Lopez,1090123456,300 555 0199,Calle 10 #4-21\n";

        assert_eq!(import_clients(&db, sheet.as_bytes()).await.unwrap(), 1);

        let mut buffer = Vec::new();
        export_clients(&db, &mut buffer).await.unwrap();
        let exported = String::from_utf8(buffer).unwrap();
        assert!(exported.contains("Maria Lopez"));
        assert!(exported.contains("1090123456"));
    }
}
