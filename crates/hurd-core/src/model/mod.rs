pub mod card;
pub mod city;
pub mod disease;
