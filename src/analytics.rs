//! Read-only aggregations behind the admin dashboards.
//!
//! Everything here is a pure function over snapshots taken from the stores, so
//! the views can be tested without any actor running.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{Order, OrderStatus, Product};

const TOP_SELLERS: usize = 10;
const TOP_STATS_PRODUCTS: usize = 5;
const SALES_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub low_stock_count: usize,
    pub low_stock_products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_name: String,
    pub total_sold: u64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub order_count: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category: Option<String>,
    pub item_count: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDashboard {
    pub summary: Summary,
    pub top_products: Vec<ProductSales>,
    pub sales_over_time: Vec<DailySales>,
    pub category_sales: Vec<CategorySales>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub id: u64,
    pub name: String,
    pub total_sold: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: usize,
    pub total_products: usize,
    /// Two decimals, as a string.
    pub total_revenue: String,
    pub total_users: usize,
    pub top_products: Vec<TopProduct>,
}

/// Revenue only counts orders that are still completed.
pub fn completed_revenue(orders: &[Order]) -> f64 {
    orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .map(|order| order.total_amount)
        .sum()
}

pub fn dashboard(orders: &[Order], products: &[Product], now: DateTime<Utc>) -> AnalyticsDashboard {
    let mut low_stock: Vec<Product> = products.iter().filter(|p| p.is_low_stock()).cloned().collect();
    low_stock.sort_by_key(|p| p.stock);

    AnalyticsDashboard {
        summary: Summary {
            total_revenue: completed_revenue(orders),
            total_orders: orders.len(),
            low_stock_count: low_stock.len(),
            low_stock_products: low_stock,
        },
        top_products: top_sellers(orders),
        sales_over_time: sales_over_time(orders, now),
        category_sales: category_sales(orders, products),
    }
}

/// Items grouped by the product name recorded at checkout.
fn top_sellers(orders: &[Order]) -> Vec<ProductSales> {
    let mut by_name: HashMap<&str, ProductSales> = HashMap::new();
    for item in orders.iter().flat_map(|order| &order.items) {
        let entry = by_name.entry(item.product_name.as_str()).or_insert_with(|| ProductSales {
            product_name: item.product_name.clone(),
            total_sold: 0,
            total_revenue: 0.0,
        });
        entry.total_sold += u64::from(item.quantity);
        entry.total_revenue += item.subtotal;
    }

    let mut sales: Vec<ProductSales> = by_name.into_values().collect();
    sales.sort_by(|a, b| {
        b.total_sold
            .cmp(&a.total_sold)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    sales.truncate(TOP_SELLERS);
    sales
}

fn sales_over_time(orders: &[Order], now: DateTime<Utc>) -> Vec<DailySales> {
    let since = now - Duration::days(SALES_WINDOW_DAYS);
    let mut days: BTreeMap<NaiveDate, DailySales> = BTreeMap::new();
    for order in orders.iter().filter(|order| order.created_at >= since) {
        let date = order.created_at.date_naive();
        let day = days.entry(date).or_insert(DailySales {
            date,
            order_count: 0,
            revenue: 0.0,
        });
        day.order_count += 1;
        day.revenue += order.total_amount;
    }
    days.into_values().collect()
}

/// Items whose product was deleted are left out.
fn category_sales(orders: &[Order], products: &[Product]) -> Vec<CategorySales> {
    let categories: HashMap<u64, Option<&String>> =
        products.iter().map(|p| (p.id, p.category.as_ref())).collect();

    let mut by_category: HashMap<Option<&String>, CategorySales> = HashMap::new();
    for item in orders.iter().flat_map(|order| &order.items) {
        let Some(&category) = categories.get(&item.product_id) else {
            continue;
        };
        let entry = by_category.entry(category).or_insert_with(|| CategorySales {
            category: category.cloned(),
            item_count: 0,
            revenue: 0.0,
        });
        entry.item_count += 1;
        entry.revenue += item.subtotal;
    }

    let mut sales: Vec<CategorySales> = by_category.into_values().collect();
    sales.sort_by(|a, b| b.revenue.total_cmp(&a.revenue).then_with(|| a.category.cmp(&b.category)));
    sales
}

pub fn dashboard_stats(orders: &[Order], products: &[Product], total_users: usize) -> DashboardStats {
    let names: HashMap<u64, &str> = products.iter().map(|p| (p.id, p.name.as_str())).collect();

    let mut sold: HashMap<u64, u64> = HashMap::new();
    for item in orders.iter().flat_map(|order| &order.items) {
        *sold.entry(item.product_id).or_default() += u64::from(item.quantity);
    }

    let mut top_products: Vec<TopProduct> = sold
        .into_iter()
        .filter_map(|(id, total_sold)| {
            names.get(&id).map(|name| TopProduct {
                id,
                name: name.to_string(),
                total_sold,
            })
        })
        .collect();
    top_products.sort_by_key(|top| (Reverse(top.total_sold), top.id));
    top_products.truncate(TOP_STATS_PRODUCTS);

    DashboardStats {
        total_orders: orders.len(),
        total_products: products.len(),
        total_revenue: format!("{:.2}", completed_revenue(orders)),
        total_users,
        top_products,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderItem;

    fn product(id: u64, name: &str, category: Option<&str>, stock: u32, threshold: u32) -> Product {
        let mut product = Product::new(id, name, 1.0, stock);
        product.category = category.map(str::to_string);
        product.low_stock_threshold = threshold;
        product
    }

    fn order(id: u64, status: OrderStatus, at: DateTime<Utc>, items: &[(u64, &str, u32, f64)]) -> Order {
        let items: Vec<OrderItem> = items
            .iter()
            .enumerate()
            .map(|(i, &(product_id, name, quantity, price))| OrderItem {
                id: id * 100 + i as u64,
                order_id: id,
                product_id,
                product_name: name.to_string(),
                quantity,
                price,
                subtotal: price * f64::from(quantity),
            })
            .collect();
        Order {
            id,
            user_id: None,
            total_amount: items.iter().map(|item| item.subtotal).sum(),
            status,
            customer_name: "Guest".into(),
            customer_email: "guest@example.com".into(),
            idempotency_key: None,
            items,
            created_at: at,
            updated_at: at,
        }
    }

    fn fixture(now: DateTime<Utc>) -> (Vec<Order>, Vec<Product>) {
        let products = vec![
            product(1, "Tea", Some("Drinks"), 40, 10),
            product(2, "Pot", Some("Kitchen"), 3, 5),
            product(3, "Cup", None, 10, 10),
        ];
        let orders = vec![
            order(1, OrderStatus::Completed, now - Duration::days(40), &[(1, "Tea", 5, 2.0)]),
            order(2, OrderStatus::Completed, now - Duration::days(2), &[(1, "Tea", 2, 2.0), (2, "Pot", 1, 30.0)]),
            order(3, OrderStatus::Cancelled, now - Duration::days(2), &[(3, "Cup", 4, 5.0)]),
            order(4, OrderStatus::Completed, now, &[(9, "Old Lamp", 1, 50.0)]),
        ];
        (orders, products)
    }

    #[test]
    fn test_dashboard_summary_counts_completed_revenue_only() {
        let now = Utc::now();
        let (orders, products) = fixture(now);
        let view = dashboard(&orders, &products, now);

        assert_eq!(view.summary.total_revenue, 10.0 + 34.0 + 50.0);
        assert_eq!(view.summary.total_orders, 4);
        let low: Vec<u64> = view.summary.low_stock_products.iter().map(|p| p.id).collect();
        assert_eq!(low, vec![2, 3]);
        assert_eq!(view.summary.low_stock_count, 2);
    }

    #[test]
    fn test_top_sellers_group_by_recorded_name() {
        let now = Utc::now();
        let (orders, products) = fixture(now);
        let view = dashboard(&orders, &products, now);

        assert_eq!(
            view.top_products[0],
            ProductSales { product_name: "Tea".into(), total_sold: 7, total_revenue: 14.0 }
        );
        assert!(view.top_products.iter().any(|p| p.product_name == "Old Lamp"));
    }

    #[test]
    fn test_sales_window_buckets_by_day() {
        let now = Utc::now();
        let (orders, products) = fixture(now);
        let view = dashboard(&orders, &products, now);

        let days: Vec<(usize, f64)> = view.sales_over_time.iter().map(|d| (d.order_count, d.revenue)).collect();
        assert_eq!(days, vec![(2, 54.0), (1, 50.0)]);
        assert!(view.sales_over_time[0].date < view.sales_over_time[1].date);
    }

    #[test]
    fn test_category_sales_skip_deleted_products() {
        let now = Utc::now();
        let (orders, products) = fixture(now);
        let view = dashboard(&orders, &products, now);

        assert_eq!(
            view.category_sales,
            vec![
                CategorySales { category: Some("Kitchen".into()), item_count: 1, revenue: 30.0 },
                CategorySales { category: None, item_count: 1, revenue: 20.0 },
                CategorySales { category: Some("Drinks".into()), item_count: 2, revenue: 14.0 },
            ]
        );
    }

    #[test]
    fn test_dashboard_stats() {
        let now = Utc::now();
        let (orders, products) = fixture(now);
        let stats = dashboard_stats(&orders, &products, 3);

        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_revenue, "94.00");
        assert_eq!(stats.total_users, 3);
        let top: Vec<(u64, u64)> = stats.top_products.iter().map(|t| (t.id, t.total_sold)).collect();
        assert_eq!(top, vec![(1, 7), (3, 4), (2, 1)]);
    }

    #[test]
    fn test_empty_store_views() {
        let view = dashboard(&[], &[], Utc::now());
        assert_eq!(view.summary.total_revenue, 0.0);
        assert!(view.top_products.is_empty());
        assert_eq!(dashboard_stats(&[], &[], 0).total_revenue, "0.00");
    }
}
