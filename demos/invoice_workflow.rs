//! End-to-end invoicing walkthrough: configure a merchant, take an order
//! through the processing hook, and print the GST breakdown an invoice
//! renderer would consume.
//!
//! Run with: cargo run --example invoice_workflow

use bigdecimal::BigDecimal;
use gst_invoice_core::{
    amount_to_words, InvoiceService, LineItem, MemoryStorage, Order, OrderStatus, ProductGstMeta,
};

#[tokio::main]
async fn main() {
    // Merchant configuration (normally the platform's option store)
    let storage = MemoryStorage::new();
    storage.set_invoice_prefix("INV-");
    storage.set_company_state_code("29"); // Karnataka

    storage.insert_product_meta(
        "basmati-rice",
        ProductGstMeta {
            hsn_code: "1006".to_string(),
            gst_rate: Some(BigDecimal::from(5)),
            tax_class: String::new(),
        },
    );
    storage.insert_product_meta(
        "air-cooler",
        ProductGstMeta {
            hsn_code: "8479".to_string(),
            gst_rate: Some(BigDecimal::from(18)),
            tax_class: String::new(),
        },
    );

    // An order from a buyer in another state (Maharashtra)
    let mut order = Order::new("7842".to_string(), OrderStatus::Processing);
    order.billing.name = "A. Kumar".to_string();
    order.billing.state_code = Some("27".to_string());
    order.line_items = vec![
        LineItem::new(
            Some("basmati-rice".to_string()),
            "Basmati Rice 5kg".to_string(),
            2,
            BigDecimal::from(450),
        ),
        LineItem::new(
            Some("air-cooler".to_string()),
            "Desert Air Cooler".to_string(),
            1,
            BigDecimal::from(6499),
        ),
    ];
    storage.insert_order(order);

    let service = InvoiceService::new(storage);

    // The checkout hook fires as the order reaches processing
    let number = service
        .handle_order_event("7842", OrderStatus::Processing)
        .await
        .unwrap()
        .expect("processing status triggers invoicing");
    println!("Invoice number: {}", number);

    let record = service.invoice_record("7842").await.unwrap().unwrap();
    println!("Invoice date:   {}\n", record.date);

    // What the PDF renderer consumes
    let breakdown = service.get_tax_breakdown("7842").await.unwrap();
    println!(
        "Jurisdiction:   {}",
        if breakdown.is_inter_state {
            "inter-state (IGST)"
        } else {
            "intra-state (CGST + SGST)"
        }
    );

    println!("\n{:>6}  {:>10}  {:>8}  {:>8}  {:>8}", "Rate", "Taxable", "IGST", "CGST", "SGST");
    for (rate, bucket) in &breakdown.rates {
        let b = bucket.rounded(2);
        println!(
            "{:>5}%  {:>10}  {:>8}  {:>8}  {:>8}",
            rate, b.taxable, b.igst, b.cgst, b.sgst
        );
    }
    let totals = breakdown.totals.rounded(2);
    println!(
        "{:>6}  {:>10}  {:>8}  {:>8}  {:>8}",
        "Total", totals.taxable, totals.igst, totals.cgst, totals.sgst
    );

    println!("\nRound off:      {}", breakdown.round_off().with_scale(2));
    println!("Invoice total:  {}", breakdown.final_amount());
    println!(
        "In words:       {}",
        amount_to_words(&breakdown.final_amount()).unwrap()
    );
}
