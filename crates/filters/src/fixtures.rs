//! Shared test fixtures.

use storefront_catalog::{Brand, CategoryRef, Country, Product};

pub(crate) fn machine(id: &str, brand: &str, year: i64, available: bool) -> Product {
    Product::new(id, format!("Machine {id}"))
        .with_category(CategoryRef::new("c-exc", "Excavators"))
        .with_brand(Brand::new(format!("b-{brand}"), brand))
        .with_country(Country::new("k-jp", "Japan"))
        .with_condition("Used")
        .with_option(format!("{brand}-{}", year % 3))
        .with_year(year)
        .with_available(available)
}

/// Ten products: brand A x3 / B x7, six available, years spread over 2010..=2024.
pub(crate) fn ten_machines() -> Vec<Product> {
    vec![
        machine("p0", "A", 2010, true),
        machine("p1", "B", 2012, true),
        machine("p2", "B", 2018, false),
        machine("p3", "A", 2019, true),
        machine("p4", "B", 2020, false),
        machine("p5", "B", 2021, true),
        machine("p6", "A", 2024, false),
        machine("p7", "B", 2015, true),
        machine("p8", "B", 2017, false),
        machine("p9", "B", 2023, true),
    ]
}
