pub mod gateway;
pub mod razorpay;
pub mod signature;

pub use gateway::{GatewayOrder, OrderRequest, PaymentError, PaymentGateway};
pub use razorpay::RazorpayClient;
pub use signature::{generate_payment_signature, verify_payment_signature};
