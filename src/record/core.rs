//! Defines the sale transaction record and the builder used to insert new records.

use serde::{Deserialize, Serialize};
use time::Date;

/// Database identifier for a sale record.
pub type RecordId = i64;

/// A product sale transaction, the unit every analytics query works over.
///
/// Records are created in bulk by the seed pipeline and are read-only
/// afterwards. To create a new record, use [Record::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The ID assigned by the record store on insertion.
    pub id: RecordId,
    /// The product name.
    pub title: String,
    /// A free text description of the product.
    pub description: String,
    /// The sale price, never negative.
    pub price: f64,
    /// A short, low cardinality label such as "electronics".
    pub category: String,
    /// An optional URL for a picture of the product.
    pub image: Option<String>,
    /// Whether the product was sold.
    pub sold: bool,
    /// The calendar date of the sale.
    pub date_of_sale: Date,
}

impl Record {
    /// Create a new record.
    ///
    /// Shortcut for [NewRecord] for discoverability.
    pub fn build(title: &str, price: f64, category: &str, date_of_sale: Date) -> NewRecord {
        NewRecord {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: category.to_owned(),
            image: None,
            sold: false,
            date_of_sale,
        }
    }
}

/// A record that has not been given an ID by a record store yet.
///
/// # Examples
///
/// ```
/// use time::macros::date;
///
/// use sales_insights::Record;
///
/// let record = Record::build("Fjallraven Backpack", 329.85, "men's clothing", date!(2021 - 11 - 27))
///     .description("Your perfect pack for everyday use")
///     .sold(true);
///
/// assert!(record.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// The product name.
    pub title: String,
    /// A free text description of the product.
    pub description: String,
    /// The sale price.
    ///
    /// Must be a finite, non-negative number.
    pub price: f64,
    /// The product category.
    ///
    /// Must not be empty or only whitespace.
    pub category: String,
    /// An optional URL for a picture of the product.
    pub image: Option<String>,
    /// Whether the product was sold.
    pub sold: bool,
    /// The calendar date of the sale.
    pub date_of_sale: Date,
}

impl NewRecord {
    /// Set the description of the record.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the image URL of the record.
    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Set whether the record was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Check the record against the data model invariants.
    ///
    /// # Errors
    /// Returns a description of the first broken invariant if the price is
    /// negative or not finite, or if the category is empty.
    pub fn validate(&self) -> Result<(), String> {
        if !self.price.is_finite() {
            return Err(format!("price {} is not a finite number", self.price));
        }

        if self.price < 0.0 {
            return Err(format!("price {} is negative", self.price));
        }

        if self.category.trim().is_empty() {
            return Err("category is empty".to_owned());
        }

        Ok(())
    }
}
