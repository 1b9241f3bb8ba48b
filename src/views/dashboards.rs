//! Static role pages: landing, owner, dispatcher and mechanic dashboards

use crate::core::router::{Role, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub route: Route,
    pub title: &'static str,
    pub lines: Vec<&'static str>,
    pub cards: Vec<&'static str>,
    pub links: Vec<Route>,
}

/// The static page for `route`, or `None` for data-backed pages
pub fn page(route: Route) -> Option<Page> {
    (!route.needs_api()).then(|| build(route))
}

/// Dashboard for a role
pub fn for_role(role: Role) -> Page {
    build(role.home())
}

fn build(route: Route) -> Page {
    let (lines, cards): (Vec<&'static str>, Vec<&'static str>) = match route {
        Route::Home => (vec!["Choose a dashboard:"], vec![]),
        Route::Owner => (
            vec![],
            vec![
                "Jobs in progress (soon)",
                "Hours today (soon)",
                "Parts low stock (soon)",
            ],
        ),
        Route::Dispatch => (
            vec!["Create work orders, assign mechanics, upload invoices (coming soon)."],
            vec![],
        ),
        Route::Mechanic => (
            vec!["Clock in/out, my jobs, parts locations (coming soon)."],
            vec![],
        ),
        Route::Units | Route::Mechanics | Route::WorkOrders => (vec![], vec![]),
    };

    Page {
        route,
        title: route.title(),
        lines,
        cards,
        links: route.links(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_cards_and_links() {
        let owner = page(Route::Owner).unwrap();
        assert_eq!(owner.title, "Owner Dashboard");
        assert_eq!(owner.cards.len(), 3);
        assert!(owner.cards.contains(&"Parts low stock (soon)"));
        assert!(owner.links.contains(&Route::Units));
        assert!(owner.links.contains(&Route::Mechanics));
    }

    #[test]
    fn test_role_placeholders() {
        assert_eq!(
            for_role(Role::Dispatcher).lines,
            vec!["Create work orders, assign mechanics, upload invoices (coming soon)."]
        );
        assert_eq!(
            for_role(Role::Mechanic).lines,
            vec!["Clock in/out, my jobs, parts locations (coming soon)."]
        );
    }

    #[test]
    fn test_data_pages_are_not_static() {
        assert!(page(Route::WorkOrders).is_none());
        assert!(page(Route::Units).is_none());
        assert_eq!(
            page(Route::Home).unwrap().links,
            vec![Route::Owner, Route::Dispatch, Route::Mechanic]
        );
    }
}
