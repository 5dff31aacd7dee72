pub mod myfinstocks;
