mod otp_repo;
mod session_repo;
mod user_repo;

pub use otp_repo::OtpRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
