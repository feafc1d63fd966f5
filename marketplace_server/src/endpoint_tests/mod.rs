mod fulfillment;
mod helpers;
mod mocks;
mod orders;
mod refunds;
mod webhooks;
