mod audit_verification;
mod entropy_quality;
