// Resource kinds - the two parallel collections served by the API
// Each kind owns its table name and every user-facing string for it

use std::fmt;

/// A collection exposed under `/api/<table>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Zoos,
    Bears,
}

impl ResourceKind {
    /// Every kind, in route registration order
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Zoos, ResourceKind::Bears];

    /// Table name (also the plural used in URLs and list errors)
    pub fn table(&self) -> &'static str {
        match self {
            ResourceKind::Zoos => "zoos",
            ResourceKind::Bears => "bears",
        }
    }

    /// Singular noun: "zoo", "bear"
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Zoos => "zoo",
            ResourceKind::Bears => "bear",
        }
    }

    /// Capitalized singular used at the start of success messages
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Zoos => "Zoo",
            ResourceKind::Bears => "Bear",
        }
    }

    /// Collection path, e.g. `/api/zoos`
    pub fn collection_path(&self) -> String {
        format!("/api/{}", self.table())
    }

    /// Item path with an `:id` capture, e.g. `/api/zoos/:id`
    pub fn item_path(&self) -> String {
        format!("/api/{}/:id", self.table())
    }

    // ========================================================================
    // Response wording
    // ========================================================================

    pub fn missing_name_on_create(&self) -> String {
        format!("You must provide a name for the new {} record.", self.singular())
    }

    pub fn missing_name_on_update(&self) -> String {
        format!(
            "Please provide the changes you intend to make to the {} record.",
            self.singular()
        )
    }

    pub fn not_found(&self) -> String {
        format!("There is no {} with that ID.", self.singular())
    }

    pub fn updated(&self) -> String {
        format!("{} data successfully updated.", self.title())
    }

    pub fn deleted(&self) -> String {
        format!("{} data successfully deleted.", self.title())
    }

    /// Context prefix for a store failure during `op`
    pub fn store_failure(&self, op: Operation) -> String {
        let s = self.singular();
        match op {
            // Insert and read-back share one message
            Operation::Create => format!(
                "There was an error adding the {s} data, or an error retrieving the added {s} data."
            ),
            Operation::List => format!("There was an error retrieving the {} data.", self.table()),
            Operation::Get => format!("There was an error retrieving the {s} data."),
            Operation::Update => format!("There was an error updating the {s} data."),
            Operation::Delete => format!("There was an error deleting the {s} data."),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// The five operations every resource supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(ResourceKind::Zoos.collection_path(), "/api/zoos");
        assert_eq!(ResourceKind::Bears.item_path(), "/api/bears/:id");
    }

    #[test]
    fn test_wording_per_kind() {
        assert_eq!(
            ResourceKind::Zoos.missing_name_on_create(),
            "You must provide a name for the new zoo record."
        );
        assert_eq!(ResourceKind::Bears.not_found(), "There is no bear with that ID.");
        assert_eq!(ResourceKind::Zoos.deleted(), "Zoo data successfully deleted.");
        assert_eq!(ResourceKind::Bears.updated(), "Bear data successfully updated.");
    }

    #[test]
    fn test_store_failure_context() {
        assert_eq!(
            ResourceKind::Bears.store_failure(Operation::Create),
            "There was an error adding the bear data, or an error retrieving the added bear data."
        );
        // List uses the plural
        assert_eq!(
            ResourceKind::Zoos.store_failure(Operation::List),
            "There was an error retrieving the zoos data."
        );
        assert_eq!(
            ResourceKind::Zoos.store_failure(Operation::Get),
            "There was an error retrieving the zoo data."
        );
    }
}
