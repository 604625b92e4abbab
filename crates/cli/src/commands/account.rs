//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! fruittura account register -n "Priya Sharma" -e priya@fruittura.in -p '...' --confirm-password '...' --accept-terms
//! fruittura account login -e priya@fruittura.in -p '...'
//! fruittura account address add --name "Priya Sharma" --phone 9876543210 --line1 "12 MG Road" \
//!     --city Pune --state Maharashtra --pincode 411001 --default
//! fruittura account logout
//! ```

use clap::{Args, Subcommand};
use secrecy::SecretString;

use fruittura_core::AddressId;
use fruittura_storefront::Storefront;
use fruittura_storefront::checkout::{CheckoutError, missing_fields};
use fruittura_storefront::models::{AddressDraft, User, UserUpdate};
use fruittura_storefront::services::auth::{
    self, LoginForm, RegistrationForm, password_strength, require_user,
};

use super::CliError;
use crate::render;

#[derive(Subcommand)]
pub enum AccountAction {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        confirm_password: String,

        /// Accept the terms of service
        #[arg(long)]
        accept_terms: bool,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out (the cart and wishlist are kept)
    Logout,
    /// Show the signed-in profile
    Show,
    /// Edit the signed-in profile
    Update {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },
    /// Manage saved addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
}

#[derive(Subcommand)]
pub enum AddressAction {
    /// Save a new address
    Add {
        #[command(flatten)]
        address: AddressArgs,

        /// Make this the default address
        #[arg(long)]
        default: bool,
    },
    /// Delete a saved address
    Remove { id: String },
    /// Mark a saved address as the default
    Default { id: String },
}

/// Shipping address fields.
#[derive(Args, Debug, Default)]
pub struct AddressArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub line1: Option<String>,
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub pincode: Option<String>,
}

impl AddressArgs {
    /// Overwrite the fields given on the command line.
    pub fn apply_to(self, draft: &mut AddressDraft) {
        let fields = [
            (self.name, &mut draft.name),
            (self.phone, &mut draft.phone),
            (self.line1, &mut draft.line1),
            (self.line2, &mut draft.line2),
            (self.city, &mut draft.city),
            (self.state, &mut draft.state),
            (self.pincode, &mut draft.pincode),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

pub fn run(action: AccountAction, storefront: &mut Storefront) -> Result<(), CliError> {
    match action {
        AccountAction::Register {
            name,
            email,
            phone,
            password,
            confirm_password,
            accept_terms,
        } => {
            let strength = password_strength(&password);
            let form = RegistrationForm {
                name,
                email,
                phone,
                password: SecretString::from(password),
                confirm_password: SecretString::from(confirm_password),
                accept_terms,
            };
            let next = auth::register(form, storefront.auth_mut())?;
            render::message(&format!("Account created (password strength {strength}/4)"));
            render::navigation(&next);
        }
        AccountAction::Login { email, password } => {
            let form = LoginForm {
                email,
                password: SecretString::from(password),
            };
            let next = auth::login(form, storefront.auth_mut())?;
            render::navigation(&next);
        }
        AccountAction::Logout => {
            let next = auth::logout(storefront.auth_mut());
            render::navigation(&next);
        }
        AccountAction::Show => render::user(require_user(storefront.auth())?),
        AccountAction::Update { name, phone } => {
            let update = UserUpdate {
                name,
                phone,
                ..UserUpdate::default()
            };
            auth::update_profile(storefront.auth_mut(), update)?;
        }
        AccountAction::Address { action } => run_address(action, storefront)?,
    }
    Ok(())
}

fn run_address(action: AddressAction, storefront: &mut Storefront) -> Result<(), CliError> {
    let user = require_user(storefront.auth())?;

    match action {
        AddressAction::Add { address, default } => {
            let mut draft = AddressDraft::default();
            address.apply_to(&mut draft);

            let missing = missing_fields(&draft);
            if !missing.is_empty() {
                return Err(CheckoutError::Validation { missing }.into());
            }

            let id = next_address_id(user);
            storefront
                .auth_mut()
                .add_address(draft.into_address(id.clone(), default));
            render::message(&format!("Saved address {id}"));
        }
        AddressAction::Remove { id } => {
            storefront.auth_mut().remove_address(&AddressId::new(id));
        }
        AddressAction::Default { id } => {
            storefront.auth_mut().set_default_address(&AddressId::new(id));
        }
    }
    Ok(())
}

/// `addr-N`, one past the highest numbered address on file.
fn next_address_id(user: &User) -> AddressId {
    let next = user
        .addresses
        .iter()
        .filter_map(|a| a.id.as_str().strip_prefix("addr-")?.parse::<u32>().ok())
        .max()
        .map_or(1, |n| n.saturating_add(1));
    AddressId::new(format!("addr-{next}"))
}
