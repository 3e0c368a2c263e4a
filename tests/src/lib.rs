#![cfg(test)]
mod net;
mod scan;
