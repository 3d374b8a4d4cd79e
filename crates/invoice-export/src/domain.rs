//! Typed records produced by the extraction and enrichment pipelines.
//!
//! Field names exposed through [`Record`] match the JSON names, so the same
//! dialect works for a typed `InvoiceItem` and for a [`FlatRecord`](crate::FlatRecord)
//! deserialized from the same JSON.

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::Scalar;

/// One extracted invoice line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceItem {
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
}

impl InvoiceItem {
    pub const PRODUCT_CODE: &'static str = "productCode";
    pub const PRODUCT_NAME: &'static str = "productName";
    pub const QUANTITY: &'static str = "quantity";
    pub const UNIT_PRICE: &'static str = "unitPrice";

    pub fn new(
        product_code: impl Into<String>,
        product_name: impl Into<String>,
        quantity: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            product_code: Some(product_code.into()),
            product_name: Some(product_name.into()),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
        }
    }
}

impl Record for InvoiceItem {
    fn field(&self, name: &str) -> Scalar<'_> {
        match name {
            Self::PRODUCT_CODE => self.product_code.as_deref().into(),
            Self::PRODUCT_NAME => self.product_name.as_deref().into(),
            Self::QUANTITY => self.quantity.into(),
            Self::UNIT_PRICE => self.unit_price.into(),
            _ => Scalar::Absent,
        }
    }
}

/// A key/value technical specification of an enriched product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specification {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Specification {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }
}

impl Record for Specification {
    fn field(&self, name: &str) -> Scalar<'_> {
        match name {
            "key" => self.key.as_deref().into(),
            "value" => self.value.as_deref().into(),
            _ => Scalar::Absent,
        }
    }
}

/// Where an enriched product can be bought.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub store: Option<String>,
    pub price: Option<String>,
    pub in_stock: Option<bool>,
    pub url: Option<String>,
}

impl Availability {
    pub fn new(store: impl Into<String>, price: impl Into<String>, in_stock: bool) -> Self {
        Self {
            store: Some(store.into()),
            price: Some(price.into()),
            in_stock: Some(in_stock),
            url: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Record for Availability {
    fn field(&self, name: &str) -> Scalar<'_> {
        match name {
            "store" => self.store.as_deref().into(),
            "price" => self.price.as_deref().into(),
            "inStock" => self.in_stock.into(),
            "url" => self.url.as_deref().into(),
            _ => Scalar::Absent,
        }
    }
}

/// A product record after AI-assisted enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichedProduct {
    pub original_product_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub specifications: Vec<Specification>,
    pub availability: Vec<Availability>,
}

impl EnrichedProduct {
    pub const SPECIFICATIONS: &'static str = "specifications";
    pub const AVAILABILITY: &'static str = "availability";

    pub fn new(original_product_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            original_product_name: Some(original_product_name.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn spec(mut self, spec: Specification) -> Self {
        self.specifications.push(spec);
        self
    }

    pub fn offer(mut self, availability: Availability) -> Self {
        self.availability.push(availability);
        self
    }
}

impl Record for EnrichedProduct {
    fn field(&self, name: &str) -> Scalar<'_> {
        match name {
            "originalProductName" => self.original_product_name.as_deref().into(),
            "title" => self.title.as_deref().into(),
            "description" => self.description.as_deref().into(),
            "imageUrl" => self.image_url.as_deref().into(),
            _ => Scalar::Absent,
        }
    }

    fn collection(&self, name: &str) -> Vec<&dyn Record> {
        match name {
            Self::SPECIFICATIONS => self
                .specifications
                .iter()
                .map(|s| s as &dyn Record)
                .collect(),
            Self::AVAILABILITY => self
                .availability
                .iter()
                .map(|a| a as &dyn Record)
                .collect(),
            _ => Vec::new(),
        }
    }
}
