//! Screen routes and their access guards.
//!
//! The app shell owns navigation; this table is the single source of
//! truth for which screens exist and who may enter them. Checkout stays
//! public here because the orchestrator itself turns an unauthenticated
//! run into a validation error.

use crate::models::User;

/// Every screen the shell can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Signup,
    Catalog,
    Cart,
    Checkout,
    AboutApp,
    AboutProducts,
    CompanyHistory,
    Contact,
    Profile,
    OrderHistory,
    AdminDashboard,
    AdminProducts,
    AdminOrders,
}

/// Who may enter a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in administrators only.
    Admin,
}

impl Screen {
    /// All screens, in menu order.
    pub const ALL: [Self; 14] = [
        Self::Login,
        Self::Signup,
        Self::Catalog,
        Self::Cart,
        Self::Checkout,
        Self::AboutApp,
        Self::AboutProducts,
        Self::CompanyHistory,
        Self::Contact,
        Self::Profile,
        Self::OrderHistory,
        Self::AdminDashboard,
        Self::AdminProducts,
        Self::AdminOrders,
    ];

    /// The shell's path for this screen.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Catalog => "/main",
            Self::Cart => "/cart",
            Self::Checkout => "/checkout",
            Self::AboutApp => "/about-app",
            Self::AboutProducts => "/about-products",
            Self::CompanyHistory => "/company-history",
            Self::Contact => "/contact",
            Self::Profile => "/profile",
            Self::OrderHistory => "/orders",
            Self::AdminDashboard => "/admin",
            Self::AdminProducts => "/admin/products",
            Self::AdminOrders => "/admin/orders",
        }
    }

    /// Resolve a path back to its screen.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|screen| screen.path() == path)
    }

    /// The access level required to enter.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Login
            | Self::Signup
            | Self::Catalog
            | Self::Cart
            | Self::Checkout
            | Self::AboutApp
            | Self::AboutProducts
            | Self::CompanyHistory
            | Self::Contact => Access::Public,
            Self::Profile | Self::OrderHistory => Access::Authenticated,
            Self::AdminDashboard | Self::AdminProducts | Self::AdminOrders => Access::Admin,
        }
    }

    /// Whether the given auth state may enter this screen.
    #[must_use]
    pub fn allows(self, user: Option<&User>) -> bool {
        match self.access() {
            Access::Public => true,
            Access::Authenticated => user.is_some(),
            Access::Admin => user.is_some_and(User::is_admin),
        }
    }

    /// Where to send a denied navigation.
    #[must_use]
    pub const fn denied_redirect(self) -> Self {
        Self::Login
    }
}
