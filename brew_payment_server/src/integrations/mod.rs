pub mod blockonomics;
