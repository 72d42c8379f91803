mod advisor_flow;
mod chat_flow;
mod config;
mod session;
