pub mod express_route_circuit_connections;
