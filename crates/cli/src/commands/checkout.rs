//! Checkout command.
//!
//! Runs the whole flow in one go: prefill the address from the account,
//! apply overrides and a coupon, validate, then place the order. Online
//! payment needs a hosted widget, which a terminal cannot show, so only cash
//! on delivery completes here.
//!
//! # Usage
//!
//! ```bash
//! fruittura checkout --cod --coupon FRUITTURA20
//! fruittura checkout --cod --address addr-2
//! ```

use clap::Args;

use fruittura_core::{AddressId, PaymentMethod};
use fruittura_storefront::Storefront;
use fruittura_storefront::checkout::{CheckoutError, NoGateway};

use super::CliError;
use super::account::AddressArgs;
use crate::render;

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Coupon code
    #[arg(short, long)]
    coupon: Option<String>,

    /// Pay cash on delivery
    #[arg(long)]
    cod: bool,

    /// Ship to a saved address
    #[arg(long)]
    address: Option<String>,

    #[command(flatten)]
    fields: AddressArgs,
}

pub async fn run(args: CheckoutArgs, storefront: &mut Storefront) -> Result<(), CliError> {
    let mut session = match storefront.begin_checkout() {
        Ok(session) => session,
        Err(err) => {
            if let Some(next) = err.redirect() {
                render::message(&err.user_message());
                render::navigation(&next);
                return Ok(());
            }
            return Err(err.into());
        }
    };

    if let Some(code) = &args.coupon {
        let applied = session.apply_coupon(storefront.pricing(), code)?;
        render::message(&format!("Applied coupon {}", applied.code));
    }

    if let Some(id) = &args.address {
        let saved = storefront
            .auth()
            .user()
            .and_then(|user| user.address(&AddressId::new(id.as_str())));
        match saved {
            Some(address) => session.use_saved_address(address),
            None => render::message(&format!("No saved address {id}; using the form fields")),
        }
    }
    args.fields.apply_to(session.draft_mut());

    if let Err(err) = session.submit_address() {
        if let CheckoutError::Validation { missing } = &err {
            render::missing_fields(missing);
        }
        return Err(err.into());
    }

    let method = if args.cod {
        PaymentMethod::CashOnDelivery
    } else {
        PaymentMethod::Gateway
    };
    session.select_payment_method(method);

    render::totals(&session.totals(storefront.cart(), storefront.pricing()));

    let payment = storefront.payment_handoff(NoGateway, NoGateway);
    let placed = storefront.place_order(&mut session, &payment).await?;

    render::order(&placed.order, storefront.pricing().currency());
    render::navigation(&placed.navigation);
    Ok(())
}
