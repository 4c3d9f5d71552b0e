use crate::domain::Product;

/// Custom actions for Product entities.
///
/// Each action runs inside the product store's message loop, so a check and
/// the mutation that depends on it can never interleave with another request.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Takes `quantity` units if that many are on hand, otherwise changes nothing.
    ReserveStock(u32),
    /// Puts back units taken by an abandoned reservation.
    ReleaseStock(u32),
}

/// Results from ProductActions
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    /// Stock level after the units were put back.
    Released(u32),
    /// Stock was taken; carries the product as it was priced at that moment.
    Reserved(Product),
    /// Not enough stock; nothing was taken.
    Insufficient { name: String, available: u32 },
}
