//! Reply texts shown to the person at the counter.

use parlor_core::domain::flavor::Flavor;
use parlor_core::domain::inventory::{FeedbackEntry, InventoryEntry, ReportEntry};

pub const UNRECOGNIZED: &str =
    "Sorry, your request cannot be processed at the moment. Please try another request.";
pub const GENERIC_FAILURE: &str =
    "Something went wrong when processing your request. Please try again.";
pub const EMPTY_MENU: &str = "Sorry, we have no flavors available right now.";
pub const FEEDBACK_SUBMITTED: &str = "Successfully submitted feedback. Thank you!";
pub const REPORT_SUBMITTED: &str = "Successfully submitted report.";
pub const WELCOME: &str = "Welcome! How may I help you today?";

pub fn menu(flavors: &[Flavor]) -> String {
    if flavors.is_empty() {
        return EMPTY_MENU.to_string();
    }
    let names = flavors.iter().map(Flavor::display_name).collect::<Vec<_>>();
    format!("Here are our available flavors: {}", names.join(", "))
}

pub fn inventory(entries: &[InventoryEntry]) -> String {
    if entries.is_empty() {
        return "Inventory\n\nNo flavors in stock yet.".to_string();
    }
    let lines = entries
        .iter()
        .map(|entry| format!("{}: {}", entry.flavor.display_name(), entry.quantity))
        .collect::<Vec<_>>();
    format!("Inventory\n\n{}", lines.join("\n"))
}

pub fn order_placed(flavor: &Flavor, quantity: i64) -> String {
    format!(
        "Successfully placed order for {quantity} scoop/s of the {} flavor. Thank you!",
        flavor.display_name()
    )
}

pub fn insufficient_stock(flavor: &Flavor) -> String {
    format!("Sorry. There is not enough stock for the {} flavor.", flavor.display_name())
}

pub fn restocked(flavor: &Flavor, quantity: i64) -> String {
    format!("Successfully restocked the {} flavor of quantity {quantity}.", flavor.display_name())
}

pub fn feedback_list(entries: &[FeedbackEntry]) -> String {
    let mut output = String::from("Customer Feedbacks\n");
    for entry in entries {
        output.push_str(&format!("\nComment: '{}'\nRating: {}\n", entry.comment, entry.rating));
    }
    output
}

pub fn report_list(entries: &[ReportEntry]) -> String {
    let mut output = String::from("Employee Satisfaction Reports\n");
    for entry in entries {
        output.push_str(&format!(
            "\nFeedback Summary: '{}'\nAverage Rating: {}\n",
            entry.feedback_summary, entry.average_rating
        ));
    }
    output
}
