//! Sales reporting
//!
//! Pure aggregation over the normalized order list: KPIs, per-product unit
//! counts and revenue grouped by calendar day (UTC). Money is summed as
//! `Decimal` and rounded once at the end.

use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::order::Order;
use crate::order::money::{add, average, lines_total, to_f64};

/// Units sold of one plate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub plate_id: String,
    pub name: String,
    pub quantity: i64,
}

/// Revenue of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

/// Aggregated figures over a list of orders
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesReport {
    pub order_count: usize,
    pub gross_revenue: f64,
    /// gross / count, 0 when there are no orders
    pub average_order_value: f64,
    pub min_ticket: Option<f64>,
    pub max_ticket: Option<f64>,
    pub unique_customers: usize,
    /// In order of first appearance
    pub products: Vec<ProductSales>,
    /// Ascending by date; days without orders are absent
    pub daily_revenue: Vec<DailyRevenue>,
}

impl SalesReport {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut gross = Decimal::ZERO;
        let mut min_ticket: Option<Decimal> = None;
        let mut max_ticket: Option<Decimal> = None;
        let mut customers: HashSet<&str> = HashSet::new();
        let mut products: IndexMap<&str, ProductSales> = IndexMap::new();
        let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

        for order in orders {
            let ticket = lines_total(order.lines());
            gross = add(gross, ticket);
            min_ticket = Some(min_ticket.map_or(ticket, |m| m.min(ticket)));
            max_ticket = Some(max_ticket.map_or(ticket, |m| m.max(ticket)));

            if !order.customer_id().is_empty() {
                customers.insert(order.customer_id());
            }

            for line in order.lines() {
                products
                    .entry(line.plate_id.as_str())
                    .or_insert_with(|| ProductSales {
                        plate_id: line.plate_id.clone(),
                        name: line.name.clone(),
                        quantity: 0,
                    })
                    .quantity += i64::from(line.quantity);
            }

            let day = days.entry(order.created_at().date_naive()).or_default();
            *day = add(*day, ticket);
        }

        Self {
            order_count: orders.len(),
            gross_revenue: to_f64(gross),
            average_order_value: to_f64(average(gross, orders.len())),
            min_ticket: min_ticket.map(to_f64),
            max_ticket: max_ticket.map(to_f64),
            unique_customers: customers.len(),
            products: products.into_values().collect(),
            daily_revenue: days
                .into_iter()
                .map(|(date, revenue)| DailyRevenue {
                    date,
                    revenue: to_f64(revenue),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Best sellers, most units first; ties keep first-seen order
    pub fn top_products(&self, n: usize) -> Vec<ProductSales> {
        let mut ranked = self.products.clone();
        ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        ranked.truncate(n);
        ranked
    }

    /// Least sold product (first-seen wins on ties)
    pub fn least_sold(&self) -> Option<&ProductSales> {
        self.products
            .iter()
            .reduce(|min, p| if p.quantity < min.quantity { p } else { min })
    }

    /// Days in `[as_of - (days - 1), as_of]`, ascending
    ///
    /// A window reaching past the earliest representable date starts there.
    pub fn trend(&self, as_of: NaiveDate, days: u32) -> Vec<DailyRevenue> {
        if days == 0 {
            return Vec::new();
        }
        let start = Duration::try_days(i64::from(days) - 1)
            .and_then(|back| as_of.checked_sub_signed(back))
            .unwrap_or(NaiveDate::MIN);
        self.daily_revenue
            .iter()
            .filter(|d| d.date >= start && d.date <= as_of)
            .cloned()
            .collect()
    }
}

/// Per-product counts as prompt text, one `- <name>: <qty> vendidos` per line
pub fn sales_summary_text(report: &SalesReport) -> String {
    report
        .products
        .iter()
        .map(|p| format!("- {}: {} vendidos", p.name, p.quantity))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn order_on(
        customer: &str,
        (y, m, d): (i32, u32, u32),
        lines: &[(&str, &str, f64, i32)],
    ) -> Order {
        let at = Utc.with_ymd_and_hms(y, m, d, 13, 30, 0).unwrap();
        let mut order = Order::new(customer, customer).with_created_at(at);
        for (id, name, price, qty) in lines {
            order.add_item(*id, *name, *price, *qty).unwrap();
        }
        order
    }

    fn sample() -> Vec<Order> {
        vec![
            order_on("c-1", (2024, 1, 1), &[("p-1", "Bandeja", 15000.0, 1)]),
            order_on("c-2", (2024, 1, 1), &[("p-2", "Sopa", 4000.0, 2)]),
            order_on("c-1", (2024, 1, 2), &[("p-3", "Jugo", 3000.0, 4)]),
        ]
    }

    #[test]
    fn test_kpis() {
        let report = SalesReport::from_orders(&sample());
        assert_eq!(report.order_count, 3);
        assert_eq!(report.gross_revenue, 35000.0);
        assert_eq!(report.average_order_value, 11666.67);
        assert_eq!(report.min_ticket, Some(8000.0));
        assert_eq!(report.max_ticket, Some(15000.0));
        assert_eq!(report.unique_customers, 2);
    }

    #[test]
    fn test_daily_revenue_grouped_by_day() {
        let report = SalesReport::from_orders(&sample());
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert_eq!(
            report.daily_revenue,
            vec![
                DailyRevenue { date: day(1), revenue: 23000.0 },
                DailyRevenue { date: day(2), revenue: 12000.0 },
            ]
        );
    }

    #[test]
    fn test_empty_list_has_zero_average() {
        let report = SalesReport::from_orders(&[]);
        assert!(report.is_empty());
        assert_eq!(report.order_count, 0);
        assert_eq!(report.average_order_value, 0.0);
        assert_eq!(report.min_ticket, None);
        assert!(report.top_products(5).is_empty());
        assert_eq!(sales_summary_text(&report), "");
    }

    #[test]
    fn test_top_products_stable_on_ties() {
        let orders = vec![
            order_on(
                "c-1",
                (2024, 2, 1),
                &[("a", "Arepa", 1000.0, 2), ("b", "Buñuelo", 500.0, 3)],
            ),
            order_on(
                "c-2",
                (2024, 2, 1),
                &[("c", "Café", 800.0, 2), ("a", "Arepa de queso", 1000.0, 1)],
            ),
        ];
        let report = SalesReport::from_orders(&orders);
        let top: Vec<_> = report
            .top_products(3)
            .into_iter()
            .map(|p| (p.name, p.quantity))
            .collect();
        // a=3 and b=3 tie, a was seen first; name is the first snapshot
        assert_eq!(
            top,
            vec![
                ("Arepa".to_string(), 3),
                ("Buñuelo".to_string(), 3),
                ("Café".to_string(), 2)
            ]
        );
        assert_eq!(report.least_sold().unwrap().plate_id, "c");
    }

    #[test]
    fn test_trend_window() {
        let orders = vec![
            order_on("c-1", (2024, 3, 1), &[("a", "Arepa", 1000.0, 1)]),
            order_on("c-1", (2024, 3, 5), &[("a", "Arepa", 1000.0, 2)]),
            order_on("c-1", (2024, 3, 7), &[("a", "Arepa", 1000.0, 3)]),
            order_on("c-1", (2024, 3, 9), &[("a", "Arepa", 1000.0, 4)]),
        ];
        let report = SalesReport::from_orders(&orders);
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let trend: Vec<f64> = report.trend(as_of, 3).iter().map(|d| d.revenue).collect();
        assert_eq!(trend, vec![2000.0, 3000.0]);
        assert!(report.trend(as_of, 0).is_empty());
    }

    #[test]
    fn test_trend_window_past_earliest_date() {
        let orders = vec![order_on("c-1", (2024, 1, 1), &[("a", "Arepa", 1000.0, 1)])];
        let report = SalesReport::from_orders(&orders);
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(report.trend(as_of, u32::MAX).len(), 1);
        assert!(SalesReport::from_orders(&[]).trend(as_of, u32::MAX).is_empty());
    }

    #[test]
    fn test_sales_summary_text() {
        let report = SalesReport::from_orders(&sample());
        assert_eq!(
            sales_summary_text(&report),
            "- Bandeja: 1 vendidos\n- Sopa: 2 vendidos\n- Jugo: 4 vendidos"
        );
    }
}
